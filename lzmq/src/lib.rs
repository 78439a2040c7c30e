//! Thin libzmq binding built around reading the library's last error code.

use std::os::raw::c_int;

pub mod context;
pub mod error;
pub mod message;
pub mod socket;
pub mod types;

pub use context::{Context, InitArgs};
pub use error::{util::get_errno, ZmqError, ZmqErrorCode, ZmqResult};
pub use message::Message;
pub use socket::{util::poll, util::PollItem, Socket};
pub use types::SocketType;

/// Version of the linked libzmq as `(major, minor, patch)`.
pub fn version() -> (i32, i32, i32) {
  let (mut major, mut minor, mut patch): (c_int, c_int, c_int) = (0, 0, 0);

  unsafe { zmq_sys::zmq_version(&mut major, &mut minor, &mut patch) };

  (major, minor, patch)
}
