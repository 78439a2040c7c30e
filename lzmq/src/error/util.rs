use std::{io, os::raw::c_int};

use super::ZmqErrorCode;

/// Where the last error code is read from.
///
/// `zmq_errno` is marked experimental by libzmq but is the accessor that matches
/// its own error semantics. If it ever goes away, build with the `os-errno`
/// feature to read the generic os indicator instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrnoSource {
  Zmq,
  Os,
}

impl ErrnoSource {
  #[cfg(not(feature = "os-errno"))]
  pub const DEFAULT: ErrnoSource = ErrnoSource::Zmq;
  #[cfg(feature = "os-errno")]
  pub const DEFAULT: ErrnoSource = ErrnoSource::Os;

  pub fn read(self) -> u64 {
    match self {
      ErrnoSource::Zmq => zmq_errno(),
      ErrnoSource::Os => os_errno(),
    }
  }
}

impl Default for ErrnoSource {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Last error code recorded for the calling thread.
///
/// Pure read, the indicator is left untouched.
pub fn get_errno() -> u64 {
  ErrnoSource::DEFAULT.read()
}

pub fn get_last_error() -> ZmqErrorCode {
  ZmqErrorCode::new(get_errno())
}

pub fn zmq_errno() -> u64 {
  let code = unsafe { zmq_sys::zmq_errno() };

  widen(code)
}

pub fn os_errno() -> u64 {
  let code = io::Error::last_os_error().raw_os_error().unwrap_or(0);

  widen(code)
}

// same conversion as c's int -> uint64_t
#[inline]
pub fn widen(code: c_int) -> u64 {
  code as u64
}

#[cfg(test)]
mod tests {
  use std::{ffi, thread};

  use proptest::prelude::*;

  use super::*;
  use crate::types::SocketType;

  #[test]
  fn default_source_is_zmq() {
    #[cfg(not(feature = "os-errno"))]
    assert_eq!(ErrnoSource::default(), ErrnoSource::Zmq);
    #[cfg(feature = "os-errno")]
    assert_eq!(ErrnoSource::default(), ErrnoSource::Os);
  }

  #[test]
  fn fresh_thread_has_no_error() {
    let code = thread::spawn(get_errno).join().unwrap();

    assert_eq!(code, 0);
  }

  #[test]
  fn matches_direct_read_after_failure() {
    thread::spawn(|| {
      let ctx = unsafe { zmq_sys::zmq_ctx_new() };
      assert!(!ctx.is_null());

      // socket type out of range
      let socket = unsafe { zmq_sys::zmq_socket(ctx, 4242) };
      assert!(socket.is_null());

      let code = get_errno();
      let direct = unsafe { zmq_sys::zmq_errno() };

      assert_eq!(code, direct as u64);
      assert_eq!(io::Error::from_raw_os_error(code as i32).kind(), io::ErrorKind::InvalidInput);

      unsafe { zmq_sys::zmq_ctx_term(ctx) };
    })
    .join()
    .unwrap();
  }

  #[test]
  fn repeated_reads_are_stable() {
    thread::spawn(|| {
      let ctx = unsafe { zmq_sys::zmq_ctx_new() };
      let socket = unsafe { zmq_sys::zmq_socket(ctx, SocketType::Pair.raw()) };
      let endpoint = ffi::CString::new("no-transport").unwrap();

      let rc = unsafe { zmq_sys::zmq_connect(socket, endpoint.as_ptr()) };
      assert_eq!(rc, -1);

      let first = get_errno();
      let second = get_errno();
      let third = get_last_error();

      assert_ne!(first, 0);
      assert_eq!(first, second);
      assert_eq!(third.code(), first);

      unsafe {
        zmq_sys::zmq_close(socket);
        zmq_sys::zmq_ctx_term(ctx);
      }
    })
    .join()
    .unwrap();
  }

  proptest! {
    #[test]
    fn widen_keeps_non_negative_codes(code in 0..=c_int::MAX) {
      prop_assert_eq!(widen(code), code as u64);
      prop_assert!(widen(code) <= c_int::MAX as u64);
    }

    #[test]
    fn widen_round_trips(code in any::<c_int>()) {
      prop_assert_eq!(widen(code) as c_int, code);
    }
  }
}
