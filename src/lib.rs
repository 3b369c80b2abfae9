// Library root
// -----------
// The binary (`main.rs`) wires these modules together; the integration
// tests drive `workflow` directly against a mock console.
//
// Module responsibilities:
// - `api`: HTTP interactions with the console (device search, bulk
//   deregister, bulk delete) plus the device and date-range types.
// - `cli`: command-line flags.
// - `config`: credentials file loading.
// - `report`: the CSV log of removed devices.
// - `ui`: operator prompts and spinners.
// - `workflow`: the search, confirm, remove, log sequence.
pub mod api;
pub mod cli;
pub mod config;
pub mod report;
pub mod ui;
pub mod workflow;
