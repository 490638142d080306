/// Agent guidance sent in the `initialize` response.
pub const INSTRUCTIONS: &str = r"# Deeper Device Control

These tools manage a Deeper Network device: its DPN (Decentralized Private
Network) routing, tunnels, content filtering, per-device access control and
bandwidth sharing.

## Concepts

* **DPN mode** decides how traffic is routed.
  * `direct`: traffic bypasses the DPN.
  * `smart`: traffic is routed through the DPN according to the device's rules.
  * `full`: all traffic goes through the DPN.
* **Tunnel**: an egress point in one country, used by the `smart` and `full` modes.
* **Tunnel code**: the tunnel's two-letter ISO 3166-1 alpha-2 country code, e.g. `US`, `JP`.
* **Region code**: the continent or region a tunnel belongs to, e.g. `AMN`, `ASE`.
* **App tunnel**: an application can be pinned to its own tunnel regardless of the DPN mode.
  Tunnel code `LL` means direct access.

## Workflow

1. Call `loginToDeeperDevice` before anything else. Every other tool except
   `setBaseUrl` needs the session it creates.
2. `getDpnMode` shows the active mode and the tunnels bound to `smart` and `full`.
3. `listTunnels` shows the tunnels that exist on the device.
4. A tunnel that is not listed must be created with `addTunnel`, which needs
   both the tunnel code and its region code.
5. `setDpnMode` switches the mode. Give it a tunnel code, or call
   `getDpnMode` first so the last known tunnel for that mode can be reused.
6. `listApps` and `setAppTunnelCode` manage per-app tunnels.
7. `testTunnelsConnectivity` pings each tunnel and repairs the unreachable ones.
8. Access control: `setAccessControl` lists devices with numbers, then
   `updateOneAccessControlDevice` edits one of them by that number.

## Region codes

| Code | Region                  |
| :--- | :---------------------- |
| AMN  | North America           |
| AMC  | The Caribbean           |
| AMM  | Central America         |
| AMS  | South America           |
| ASC  | Central Asia            |
| ASE  | East Asia               |
| ASW  | West Asia               |
| ASS  | South Asia              |
| ASD  | Southeast Asia          |
| AFN  | North Africa            |
| AFM  | Middle Africa           |
| AFE  | East Africa             |
| AFW  | West Africa             |
| AFS  | South Africa            |
| EUN  | North Europe            |
| EUE  | East Europe             |
| EUW  | West Europe             |
| EUS  | South Europe            |
| OCP  | Polynesia               |
| OCA  | Australia & New Zealand |
| OCM  | Melanesia               |
| OCN  | Micronesia              |
";
