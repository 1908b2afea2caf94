use crate::ascii::{CR, LF, NUL};
use crate::coroutine::yield_now;
use crate::slot::Slot;
use crate::transport::{RecvChain, Socket};

impl<S: Socket> Slot<S> {
    fn has_input(&self) -> bool {
        let state = self.state().borrow();
        state.recv.is_some() || state.eof
    }

    /// Read one line from the received data into `buf`, see `Connection::read_line`.
    pub(crate) async fn read_line(&self, buf: &mut [u8]) -> usize {
        let Some(end) = buf.len().checked_sub(1) else {
            return 0;
        };

        let mut len = 0;
        while len < end {
            while !self.has_input() {
                trace!("connection {}: waiting for data", self.index());
                yield_now().await;
            }

            let mut guard = self.state().borrow_mut();
            let state = &mut *guard;

            // end of stream with everything consumed
            let Some(chain) = state.recv.as_ref() else {
                break;
            };

            let copied = chain.copy_to(&mut buf[len..end], state.recv_off);
            let newline = buf[len..len + copied].iter().position(|b| *b == LF);
            let consumed = newline.map_or(copied, |i| i + 1);

            state.recv_off += consumed;
            if state.recv_off >= chain.len() {
                state.recv = None;
                state.recv_off = 0;
            }
            if let Some(socket) = state.socket.as_mut() {
                socket.recved(consumed);
            }

            if let Some(i) = newline {
                let mut line_len = len + i;
                if line_len > 0 && buf[line_len - 1] == CR {
                    line_len -= 1;
                }
                buf[line_len] = NUL;
                return line_len;
            }

            len += copied;
        }

        buf[len] = NUL;
        len
    }
}
