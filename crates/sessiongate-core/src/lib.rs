// ABOUTME: Core library for sessiongate: the shared session model, event pool, and command interpreter.
// ABOUTME: The HTTP gateway only reads this state under the session lock and mutates it through commands.

pub mod command;
pub mod devices;
pub mod event;
pub mod model;
pub mod packets;
pub mod session;

pub use command::{CommandError, CommandRunner, Interpreter};
pub use devices::{AccessPoint, Ble, BleDevice, Hid, HidDevice, Lan, Station, WiFi};
pub use event::{Event, EventPool};
pub use model::{Endpoint, Environment, Module, Options};
pub use packets::{PacketQueue, Stats, Traffic};
pub use session::{Session, SessionState};
