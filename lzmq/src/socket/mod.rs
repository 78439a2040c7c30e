use std::{ffi, mem, os::raw::c_int};

use tracing::{trace, warn};

use crate::{
  context::Context,
  error::{util::get_last_error, ZmqCodeResult, ZmqResult},
  message::Message,
  types::{RawSocket, SocketType, ZMQ_LINGER, ZMQ_RCVMORE, ZMQ_SUBSCRIBE, ZMQ_UNSUBSCRIBE},
};

use self::error::EndpointError;

pub mod error;
pub mod util;

/// A libzmq socket.
///
/// Sockets are bound to the thread that uses them, the raw pointer keeps this
/// type `!Send`.
#[derive(Debug)]
pub struct Socket<'a> {
  context: &'a Context,
  raw_socket: RawSocket,
  kind: SocketType,
}

impl<'a> Socket<'a> {
  pub fn new(context: &'a Context, kind: SocketType) -> ZmqResult<Self> {
    let raw_socket = unsafe { zmq_sys::zmq_socket(context.as_raw(), kind.raw()) };

    if raw_socket.is_null() {
      let error = get_last_error();

      Err(error.into())
    } else {
      trace!(?kind, "zmq socket opened");

      Ok(Socket {
        context,
        raw_socket,
        kind,
      })
    }
  }

  pub fn context(&self) -> &'a Context {
    self.context
  }

  pub fn kind(&self) -> SocketType {
    self.kind
  }

  pub(crate) fn as_raw(&self) -> RawSocket {
    self.raw_socket
  }

  pub fn bind(&self, endpoint: &str) -> Result<(), EndpointError> {
    let c_endpoint = ffi::CString::new(endpoint)?;

    let code = unsafe { zmq_sys::zmq_bind(self.raw_socket, c_endpoint.as_ptr()) };

    check(code)?;

    trace!(endpoint, "zmq socket bound");

    Ok(())
  }

  pub fn connect(&self, endpoint: &str) -> Result<(), EndpointError> {
    let c_endpoint = ffi::CString::new(endpoint)?;

    let code = unsafe { zmq_sys::zmq_connect(self.raw_socket, c_endpoint.as_ptr()) };

    check(code)?;

    trace!(endpoint, "zmq socket connected");

    Ok(())
  }

  /// Queues `msg` for sending. On success libzmq takes the content and leaves
  /// `msg` empty.
  pub fn send(&self, msg: &mut Message, flags: c_int) -> ZmqResult<usize> {
    let sent = unsafe { zmq_sys::zmq_msg_send(msg.as_mut_ptr(), self.raw_socket, flags) };

    if sent == -1 {
      let error = get_last_error();

      Err(error.into())
    } else {
      Ok(sent as usize)
    }
  }

  pub fn send_bytes(&self, data: &[u8], flags: c_int) -> ZmqResult<usize> {
    let mut msg = Message::from_slice(data)?;

    self.send(&mut msg, flags)
  }

  pub fn recv(&self, msg: &mut Message, flags: c_int) -> ZmqResult<usize> {
    let received = unsafe { zmq_sys::zmq_msg_recv(msg.as_mut_ptr(), self.raw_socket, flags) };

    if received == -1 {
      let error = get_last_error();

      Err(error.into())
    } else {
      Ok(received as usize)
    }
  }

  pub fn recv_bytes(&self, flags: c_int) -> ZmqResult<Vec<u8>> {
    let mut msg = Message::new();

    self.recv(&mut msg, flags)?;

    Ok(msg.as_bytes().to_vec())
  }

  pub fn set_subscribe(&self, prefix: &[u8]) -> ZmqCodeResult<()> {
    self.set_option_bytes(ZMQ_SUBSCRIBE, prefix)
  }

  pub fn set_unsubscribe(&self, prefix: &[u8]) -> ZmqCodeResult<()> {
    self.set_option_bytes(ZMQ_UNSUBSCRIBE, prefix)
  }

  /// Linger period in milliseconds, -1 waits forever.
  pub fn set_linger(&self, millis: i32) -> ZmqCodeResult<()> {
    self.set_option_int(ZMQ_LINGER, millis)
  }

  pub fn linger(&self) -> ZmqCodeResult<i32> {
    self.get_option_int(ZMQ_LINGER)
  }

  /// Whether the last received frame is followed by more parts.
  pub fn has_more(&self) -> ZmqCodeResult<bool> {
    Ok(self.get_option_int(ZMQ_RCVMORE)? != 0)
  }

  fn set_option_bytes(&self, option: c_int, value: &[u8]) -> ZmqCodeResult<()> {
    let code = unsafe { zmq_sys::zmq_setsockopt(self.raw_socket, option, value.as_ptr() as *const _, value.len()) };

    check(code)
  }

  fn set_option_int(&self, option: c_int, value: c_int) -> ZmqCodeResult<()> {
    let code = unsafe {
      zmq_sys::zmq_setsockopt(
        self.raw_socket,
        option,
        &value as *const c_int as *const _,
        mem::size_of::<c_int>(),
      )
    };

    check(code)
  }

  fn get_option_int(&self, option: c_int) -> ZmqCodeResult<c_int> {
    let mut value: c_int = 0;
    let mut size = mem::size_of::<c_int>();

    let code = unsafe {
      zmq_sys::zmq_getsockopt(
        self.raw_socket,
        option,
        &mut value as *mut c_int as *mut _,
        &mut size,
      )
    };

    check(code)?;

    Ok(value)
  }
}

impl<'a> Drop for Socket<'a> {
  fn drop(&mut self) {
    let code = unsafe { zmq_sys::zmq_close(self.raw_socket) };

    if code == -1 {
      warn!(error = %get_last_error(), "failed to close zmq socket");
    } else {
      trace!(kind = ?self.kind, "zmq socket closed");
    }
  }
}

fn check(code: c_int) -> ZmqCodeResult<()> {
  if code == -1 {
    Err(get_last_error())
  } else {
    Ok(())
  }
}
