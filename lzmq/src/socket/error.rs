use std::{error, ffi::NulError, fmt};

use crate::error::{ZmqError, ZmqErrorCode};

#[derive(Debug)]
pub enum EndpointError {
  ZmqError(ZmqError),
  InvalidEndpoint(NulError),
}

impl fmt::Display for EndpointError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EndpointError::ZmqError(zmq_error) => zmq_error.fmt(f),
      EndpointError::InvalidEndpoint(nul_error) => write!(f, "invalid endpoint - {}", nul_error),
    }
  }
}

impl error::Error for EndpointError {}

impl From<ZmqError> for EndpointError {
  fn from(zmq_error: ZmqError) -> Self {
    EndpointError::ZmqError(zmq_error)
  }
}

impl From<ZmqErrorCode> for EndpointError {
  fn from(zmq_code: ZmqErrorCode) -> Self {
    EndpointError::ZmqError(zmq_code.into())
  }
}

impl From<NulError> for EndpointError {
  fn from(nul_error: NulError) -> Self {
    EndpointError::InvalidEndpoint(nul_error)
  }
}
