#[cfg(unix)]
use std::{
  os::unix::io::{AsRawFd, BorrowedFd, RawFd},
  ptr,
};
use std::{marker::PhantomData, os::raw::c_int, os::raw::c_long};

use crate::{
  error::{util::get_last_error, ZmqError, ZmqResult},
  types::{RawPollItem, POLLERR, POLLIN, POLLOUT},
};

use super::Socket;

/// One entry of a [`poll`] set, tied to the socket or file descriptor it
/// watches.
#[repr(transparent)]
pub struct PollItem<'s> {
  raw_item: RawPollItem,
  socket: PhantomData<&'s ()>,
}

impl<'s> PollItem<'s> {
  pub fn socket(socket: &'s Socket<'_>, events: i16) -> Self {
    PollItem {
      raw_item: RawPollItem {
        socket: socket.as_raw(),
        fd: 0,
        events,
        revents: 0,
      },
      socket: PhantomData,
    }
  }

  /// Watches a plain file descriptor, libzmq polls it like `poll(2)` would.
  #[cfg(unix)]
  pub fn fd(fd: BorrowedFd<'s>, events: i16) -> Self {
    PollItem {
      raw_item: RawPollItem {
        socket: ptr::null_mut(),
        fd: fd.as_raw_fd(),
        events,
        revents: 0,
      },
      socket: PhantomData,
    }
  }

  pub fn is_socket(&self) -> bool {
    !self.raw_item.socket.is_null()
  }

  /// The watched descriptor, `None` for socket items.
  #[cfg(unix)]
  pub fn raw_fd(&self) -> Option<RawFd> {
    if self.is_socket() {
      None
    } else {
      Some(self.raw_item.fd)
    }
  }

  pub fn events(&self) -> i16 {
    self.raw_item.events
  }

  pub fn revents(&self) -> i16 {
    self.raw_item.revents
  }

  pub fn is_readable(&self) -> bool {
    self.revents() & POLLIN != 0
  }

  pub fn is_writable(&self) -> bool {
    self.revents() & POLLOUT != 0
  }

  pub fn is_error(&self) -> bool {
    self.revents() & POLLERR != 0
  }
}

/// Waits up to `timeout_ms` (-1 blocks) for events on `items`, returning how
/// many items have events pending.
pub fn poll(items: &mut [PollItem<'_>], timeout_ms: i64) -> ZmqResult<usize> {
  if items.len() > c_int::MAX as usize {
    return Err(ZmqError::BufferSizeError(items.len()));
  }

  let timeout = poll_timeout(timeout_ms)?;

  let ready = unsafe {
    zmq_sys::zmq_poll(
      // safety
      // - PollItem is repr(transparent) over zmq_pollitem_t
      items.as_mut_ptr() as *mut RawPollItem,
      items.len() as c_int,
      timeout,
    )
  };

  if ready == -1 {
    let error = get_last_error();

    Err(error.into())
  } else {
    Ok(ready as usize)
  }
}

// c_long is 32 bits on some targets
fn poll_timeout(timeout_ms: i64) -> ZmqResult<c_long> {
  c_long::try_from(timeout_ms).map_err(|_| ZmqError::TimeoutError(timeout_ms))
}
