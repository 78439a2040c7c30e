use std::{fmt, mem, slice};

use tracing::warn;

use crate::{
  error::{util::get_last_error, ZmqCodeResult, ZmqResult},
  types::RawMessage,
};

pub struct Message {
  raw_message: RawMessage,
}

impl Message {
  pub fn new() -> Self {
    let mut raw_message = blank();

    // zmq_msg_init always succeeds
    unsafe { zmq_sys::zmq_msg_init(&mut raw_message) };

    Message { raw_message }
  }

  pub fn with_size(len: usize) -> ZmqResult<Self> {
    let mut raw_message = blank();

    let code = unsafe { zmq_sys::zmq_msg_init_size(&mut raw_message, len) };

    if code == -1 {
      let error = get_last_error();

      Err(error.into())
    } else {
      Ok(Message { raw_message })
    }
  }

  pub fn from_slice(data: &[u8]) -> ZmqResult<Self> {
    let mut msg = Self::with_size(data.len())?;

    msg.as_bytes_mut().copy_from_slice(data);

    Ok(msg)
  }

  pub fn len(&self) -> usize {
    // this is ok since zmq_msg_size doesnt actually mutate the message
    unsafe { zmq_sys::zmq_msg_size(&self.raw_message as *const RawMessage as *mut RawMessage) }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn as_bytes(&self) -> &[u8] {
    let len = self.len();

    if len == 0 {
      return &[];
    }

    unsafe {
      let data = zmq_sys::zmq_msg_data(&self.raw_message as *const RawMessage as *mut RawMessage);

      // safety
      // - data points to len initialised bytes owned by this message
      slice::from_raw_parts(data as *const u8, len)
    }
  }

  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    let len = self.len();

    if len == 0 {
      return &mut [];
    }

    unsafe {
      let data = zmq_sys::zmq_msg_data(&mut self.raw_message);

      slice::from_raw_parts_mut(data as *mut u8, len)
    }
  }

  /// Makes `dest` share this message's content, releasing whatever `dest` held.
  ///
  /// Takes `&mut self` since libzmq may switch the source to a refcounted buffer.
  pub fn copy_to(&mut self, dest: &mut Message) -> ZmqCodeResult<()> {
    let code = unsafe { zmq_sys::zmq_msg_copy(&mut dest.raw_message, &mut self.raw_message) };

    if code == -1 {
      Err(get_last_error())
    } else {
      Ok(())
    }
  }

  /// Moves the content into `dest`, leaving this message empty.
  pub fn move_to(&mut self, dest: &mut Message) -> ZmqCodeResult<()> {
    let code = unsafe { zmq_sys::zmq_msg_move(&mut dest.raw_message, &mut self.raw_message) };

    if code == -1 {
      Err(get_last_error())
    } else {
      Ok(())
    }
  }

  pub(crate) fn as_mut_ptr(&mut self) -> *mut RawMessage {
    &mut self.raw_message
  }
}

// zmq_msg_t is plain bytes until zmq_msg_init* fills it in
fn blank() -> RawMessage {
  unsafe { mem::zeroed() }
}

impl Default for Message {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Message").field("len", &self.len()).finish()
  }
}

impl Drop for Message {
  fn drop(&mut self) {
    let code = unsafe { zmq_sys::zmq_msg_close(&mut self.raw_message) };

    if code == -1 {
      warn!(error = %get_last_error(), "failed to close zmq message");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_message_is_empty() {
    let msg = Message::new();

    assert!(msg.is_empty());
    assert_eq!(msg.as_bytes(), b"");
  }

  #[test]
  fn from_slice_holds_data() {
    let msg = Message::from_slice(b"ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap();

    assert_eq!(msg.len(), 26);
    assert_eq!(msg.as_bytes(), b"ABCDEFGHIJKLMNOPQRSTUVWXYZ");
  }

  #[test]
  fn with_size_is_writable() {
    let mut msg = Message::with_size(3).unwrap();

    msg.as_bytes_mut().copy_from_slice(b"xyz");

    assert_eq!(msg.as_bytes(), b"xyz");
  }

  #[test]
  fn copy_keeps_source() {
    let mut src = Message::from_slice(b"shared").unwrap();
    let mut dest = Message::from_slice(b"old").unwrap();

    src.copy_to(&mut dest).unwrap();

    assert_eq!(src.as_bytes(), b"shared");
    assert_eq!(dest.as_bytes(), b"shared");
  }

  #[test]
  fn move_empties_source() {
    let mut src = Message::from_slice(b"moved").unwrap();
    let mut dest = Message::new();

    src.move_to(&mut dest).unwrap();

    assert!(src.is_empty());
    assert_eq!(dest.as_bytes(), b"moved");
  }
}
