use std::{env, os::raw::c_int, ptr};

use tracing::{debug, warn};

use crate::{
  error::{util::get_last_error, ZmqResult},
  socket::Socket,
  types::{RawContext, SocketType, ZMQ_IO_THREADS, ZMQ_MAX_SOCKETS},
};

const IO_THREADS_ENV: &str = "LZMQ_IO_THREADS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitArgs {
  pub io_threads: i32,
  pub max_sockets: Option<i32>,
}

impl Default for InitArgs {
  // one io thread is enough for most applications
  fn default() -> Self {
    InitArgs {
      io_threads: 1,
      max_sockets: None,
    }
  }
}

impl InitArgs {
  /// Reads the io thread count from `LZMQ_IO_THREADS`, anything not > 1 means 1.
  pub fn from_env() -> Self {
    let io_threads = env::var(IO_THREADS_ENV)
      .ok()
      .and_then(|value| Self::parse_io_threads(&value))
      .unwrap_or(1);

    InitArgs {
      io_threads,
      ..Default::default()
    }
  }

  fn parse_io_threads(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|&threads| threads > 1)
  }
}

/// Owns a libzmq context.
///
/// Sockets borrow the context, so every socket is closed before the context
/// gets terminated.
#[derive(Debug)]
pub struct Context {
  raw_context: RawContext,
  args: InitArgs,
}

// libzmq contexts are thread safe
unsafe impl Send for Context {}
unsafe impl Sync for Context {}

impl Context {
  pub fn new(args: InitArgs) -> ZmqResult<Self> {
    let raw_context = unsafe { zmq_sys::zmq_ctx_new() };

    if raw_context.is_null() {
      return Err(get_last_error().into());
    }

    // take ownership straight away so a failed option still terminates it
    let context = Context { raw_context, args };

    context.set_option(ZMQ_IO_THREADS, context.args.io_threads)?;

    if let Some(max_sockets) = context.args.max_sockets {
      context.set_option(ZMQ_MAX_SOCKETS, max_sockets)?;
    }

    debug!(io_threads = context.args.io_threads, "zmq context created");

    Ok(context)
  }

  pub fn args(&self) -> &InitArgs {
    &self.args
  }

  pub fn socket(&self, kind: SocketType) -> ZmqResult<Socket<'_>> {
    Socket::new(self, kind)
  }

  pub(crate) fn as_raw(&self) -> RawContext {
    self.raw_context
  }

  fn set_option(&self, option: c_int, value: c_int) -> ZmqResult<()> {
    let code = unsafe { zmq_sys::zmq_ctx_set(self.raw_context, option, value) };

    if code == -1 {
      let error = get_last_error();

      Err(error.into())
    } else {
      Ok(())
    }
  }

  /// Terminates the context, blocking until pending messages are sent or
  /// discarded according to each socket's linger.
  pub fn terminate(mut self) -> ZmqResult<()> {
    self.term()
  }

  fn term(&mut self) -> ZmqResult<()> {
    if self.raw_context.is_null() {
      return Ok(());
    }

    loop {
      let code = unsafe { zmq_sys::zmq_ctx_term(self.raw_context) };

      if code == 0 {
        break;
      }

      let error = get_last_error();

      if !error.is_interrupted() {
        return Err(error.into());
      }
    }

    self.raw_context = ptr::null_mut();

    debug!("zmq context terminated");

    Ok(())
  }
}

// a failed term leaks the context, which beats panicking in drop
impl Drop for Context {
  fn drop(&mut self) {
    if let Err(error) = self.term() {
      warn!(%error, "failed to terminate zmq context");
    }
  }
}
