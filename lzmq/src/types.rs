use std::{ffi, os::raw::c_int};

pub type RawContext = *mut ffi::c_void;
pub type RawSocket = *mut ffi::c_void;
pub type RawMessage = zmq_sys::zmq_msg_t;
pub type RawPollItem = zmq_sys::zmq_pollitem_t;

// values from zmq.h

pub const DONTWAIT: c_int = 1;
pub const SNDMORE: c_int = 2;

pub const POLLIN: i16 = 1;
pub const POLLOUT: i16 = 2;
pub const POLLERR: i16 = 4;

pub(crate) const ZMQ_IO_THREADS: c_int = 1;
pub(crate) const ZMQ_MAX_SOCKETS: c_int = 2;

pub(crate) const ZMQ_SUBSCRIBE: c_int = 6;
pub(crate) const ZMQ_UNSUBSCRIBE: c_int = 7;
pub(crate) const ZMQ_RCVMORE: c_int = 13;
pub(crate) const ZMQ_LINGER: c_int = 17;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
  Pair = 0,
  Pub = 1,
  Sub = 2,
  Req = 3,
  Rep = 4,
  Dealer = 5,
  Router = 6,
  Pull = 7,
  Push = 8,
  XPub = 9,
  XSub = 10,
}

impl SocketType {
  pub fn raw(self) -> c_int {
    self as c_int
  }
}
