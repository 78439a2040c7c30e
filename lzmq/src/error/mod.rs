use std::{error, ffi, fmt, os::raw::c_int};

pub type ZmqResult<T> = Result<T, ZmqError>;
pub type ZmqCodeResult<T> = Result<T, ZmqErrorCode>;

pub mod util;

/// Base for the error numbers libzmq defines itself.
pub const ZMQ_HAUSNUMERO: u64 = 156384712;

pub const EFSM: u64 = ZMQ_HAUSNUMERO + 51;
pub const ENOCOMPATPROTO: u64 = ZMQ_HAUSNUMERO + 52;
pub const ETERM: u64 = ZMQ_HAUSNUMERO + 53;
pub const EMTHREAD: u64 = ZMQ_HAUSNUMERO + 54;

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum ZmqError {
  ZmqErrorCode(ZmqErrorCode),
  BufferSizeError(usize),
  TimeoutError(i64),
}

impl fmt::Display for ZmqError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ZmqError::ZmqErrorCode(zmq_code) => zmq_code.fmt(f),
      ZmqError::BufferSizeError(size) => write!(f, "invalid buffer size - {}", size),
      ZmqError::TimeoutError(millis) => write!(f, "timeout out of range - {}", millis),
    }
  }
}

impl error::Error for ZmqError {}

impl From<ZmqErrorCode> for ZmqError {
  fn from(zmq_code: ZmqErrorCode) -> Self {
    ZmqError::ZmqErrorCode(zmq_code)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZmqErrorCode(u64);

impl ZmqErrorCode {
  pub fn new(code: u64) -> Self {
    Self(code)
  }

  pub fn code(&self) -> u64 {
    self.0
  }

  pub fn message(&self) -> String {
    let msg = unsafe { zmq_sys::zmq_strerror(self.0 as c_int) };

    if msg.is_null() {
      return String::new();
    }

    // safety
    // - zmq_strerror returns a static nul terminated string
    unsafe { ffi::CStr::from_ptr(msg) }.to_string_lossy().into_owned()
  }

  pub fn is_again(&self) -> bool {
    self.os_kind() == Some(std::io::ErrorKind::WouldBlock)
  }

  pub fn is_interrupted(&self) -> bool {
    self.os_kind() == Some(std::io::ErrorKind::Interrupted)
  }

  pub fn is_fsm(&self) -> bool {
    self.0 == EFSM
  }

  pub fn is_term(&self) -> bool {
    self.0 == ETERM
  }

  fn os_kind(&self) -> Option<std::io::ErrorKind> {
    if self.0 == 0 || self.0 >= ZMQ_HAUSNUMERO {
      None
    } else {
      Some(std::io::Error::from_raw_os_error(self.0 as i32).kind())
    }
  }
}

impl fmt::Display for ZmqErrorCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "zmq error code - {} ({})", self.0, self.message())
  }
}

impl error::Error for ZmqErrorCode {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn library_codes_have_messages() {
    let code = ZmqErrorCode::new(EFSM);

    assert!(code.is_fsm());
    assert!(!code.is_again());
    assert!(code.message().contains("state"));
  }

  #[test]
  fn display_includes_code() {
    let code = ZmqErrorCode::new(ETERM);

    assert!(code.to_string().starts_with(&format!("zmq error code - {}", ETERM)));
    assert!(code.is_term());
  }

  #[test]
  fn wraps_into_zmq_error() {
    let code = ZmqErrorCode::new(EMTHREAD);
    let error: ZmqError = code.into();

    assert_eq!(error, ZmqError::ZmqErrorCode(code));
    assert_eq!(ZmqError::BufferSizeError(7).to_string(), "invalid buffer size - 7");
    assert_eq!(ZmqError::TimeoutError(-9).to_string(), "timeout out of range - -9");
  }
}
