use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use core::fmt::{Debug, Formatter};
use core::future::Future;
use core::pin::Pin;

use crate::config::Config;
use crate::coroutine::{self, Resumed};
use crate::engine;
use crate::router::{Handler, RouteError, Router};
use crate::slot::Slot;
use crate::transport::{Listener, RecvChain, Socket, TransportError};

/// Identifies one accepted connection.  The embedding glue stores it as the stack's per
/// connection callback argument and passes it back to every `Server::on_*` call.  Once the
/// connection is gone its id goes stale, events carrying a stale id are ignored even when the
/// slot was reused for a newer connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnId {
    index: u16,
    generation: u32,
}

impl ConnId {
    pub(crate) fn new(index: u16, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Index of the connection slot
    pub fn index(&self) -> u16 {
        self.index
    }
}

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// ServerError is returned when the server can not be set up
pub enum ServerError {
    /// The `Config` can not be used
    InvalidConfig(&'static str),
    /// The listener could not be bound to the configured port
    Bind(TransportError),
    /// The listener could not be put into the listening state
    Listen(TransportError),
}

/// The server did not take the connection.  The socket is handed back so the glue can refuse
/// it at the transport level.
pub enum AcceptError<S> {
    /// `Server::start` has not been called
    NotListening(S),
    /// Every connection slot is in use
    NoFreeSlot(S),
}

impl<S> AcceptError<S> {
    /// The refused socket
    pub fn into_socket(self) -> S {
        match self {
            Self::NotListening(s) | Self::NoFreeSlot(s) => s,
        }
    }
}

impl<S> Debug for AcceptError<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotListening(_) => f.write_str("NotListening"),
            Self::NoFreeSlot(_) => f.write_str("NoFreeSlot"),
        }
    }
}

/// Received data the connection could not take yet
#[derive(Debug, PartialEq)]
pub enum RecvError<C> {
    /// The previously received chain has not been consumed.  The stack should keep the chain
    /// and deliver it again later.
    Busy(C),
}

impl<C> RecvError<C> {
    /// The refused chain
    pub fn into_chain(self) -> C {
        match self {
            Self::Busy(c) => c,
        }
    }
}

type Chain<L> = <<L as Listener>::Socket as Socket>::Chain;

/// Server owns the listener, the fixed pool of connection slots and the routes.
///
/// All work happens inside the `on_*` methods, which the embedding glue calls from the
/// stack's callbacks.  Each of them resumes the task of the affected connection, which runs
/// until it needs more data or send buffer space and then returns.  A socket must therefore
/// not invoke the glue's callbacks from within its own methods: the `Server` is still
/// borrowed at that point.
///
/// The slot records and one task allocation per slot are made by `init`, nothing is allocated
/// afterwards.
pub struct Server<L: Listener, H, F> {
    listener: L,
    config: Config,
    router: Rc<Router<H>>,
    slots: Vec<Rc<Slot<L::Socket>>>,
    tasks: Vec<Pin<Box<Option<F>>>>,
    spawn: fn(Rc<Slot<L::Socket>>, Rc<Router<H>>) -> F,
    listening: bool,
}

/// Construct a `Server` with `config.max_connections` connection slots on top of `listener`.
/// Routes are registered with `Server::route`, the listener is bound by `Server::start`.
pub fn init<L: Listener, H: Handler>(
    listener: L,
    config: Config,
) -> Result<Server<L, H, impl Future<Output = ()>>, ServerError> {
    Server::assemble(listener, config, engine::serve::<L::Socket, H>)
}

impl<L, H, F> Server<L, H, F>
where
    L: Listener,
    F: Future<Output = ()>,
{
    fn assemble(
        listener: L,
        config: Config,
        spawn: fn(Rc<Slot<L::Socket>>, Rc<Router<H>>) -> F,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::InvalidConfig)?;

        let slots = (0..config.max_connections)
            .map(|i| Rc::new(Slot::new(i as u16)))
            .collect();
        let tasks = (0..config.max_connections)
            .map(|_| Box::pin(None))
            .collect();

        Ok(Self {
            listener,
            config,
            router: Rc::new(Router::new()),
            slots,
            tasks,
            spawn,
            listening: false,
        })
    }

    /// Register `handler` for requests to exactly `path`.  Routes are tried in registration
    /// order and can only be added before `start`.
    pub fn route(&mut self, path: &'static str, handler: H) -> Result<(), RouteError> {
        if self.listening {
            return Err(RouteError::AlreadyListening);
        }

        match Rc::get_mut(&mut self.router) {
            Some(router) => router.route(path, handler),
            None => Err(RouteError::AlreadyListening),
        }
    }

    /// Bind the listener to the configured port and start listening
    pub fn start(&mut self) -> Result<(), ServerError> {
        if self.listening {
            return Ok(());
        }

        self.listener
            .bind(self.config.port)
            .map_err(ServerError::Bind)?;
        self.listener.listen().map_err(ServerError::Listen)?;
        self.listening = true;

        info!("listening on port {}", self.config.port);
        Ok(())
    }

    /// A connection was accepted.  Claims the first free slot and starts the connection's task.
    pub fn on_accept(&mut self, socket: L::Socket) -> Result<ConnId, AcceptError<L::Socket>> {
        if !self.listening {
            return Err(AcceptError::NotListening(socket));
        }

        let Some(index) = self.slots.iter().position(|slot| slot.is_free()) else {
            warn!("too many connections, refusing");
            return Err(AcceptError::NoFreeSlot(socket));
        };

        let slot = &self.slots[index];
        let id = ConnId::new(slot.index(), slot.claim(socket));
        self.tasks[index]
            .as_mut()
            .set(Some((self.spawn)(Rc::clone(slot), Rc::clone(&self.router))));

        debug!("connection {}: accepted", index);
        self.resume(index);

        Ok(id)
    }

    /// Data arrived for the connection, or with `None` (or an empty chain) the peer closed its
    /// side.  Only one chain is held per connection: while the previous one has not been
    /// consumed the new one is handed back as `RecvError::Busy`.
    pub fn on_recv(&mut self, id: ConnId, chain: Option<Chain<L>>) -> Result<(), RecvError<Chain<L>>> {
        let Some(index) = self.current(id, "receive") else {
            return Ok(());
        };
        let slot = &self.slots[index];

        match chain {
            Some(chain) if !chain.is_empty() => {
                if let Err(chain) = slot.store(chain) {
                    warn!(
                        "connection {}: receive queue busy, {} bytes pending",
                        index,
                        slot.pending()
                    );
                    return Err(RecvError::Busy(chain));
                }
            }
            _ => slot.mark_eof(),
        }

        self.resume(index);
        Ok(())
    }

    /// The peer acknowledged `len` bytes, freeing send buffer space
    pub fn on_sent(&mut self, id: ConnId, len: usize) {
        let Some(index) = self.current(id, "sent") else {
            return;
        };

        trace!("connection {}: {} bytes sent", index, len);
        self.resume(index);
    }

    /// The stack dropped the connection.  Its task is discarded without being resumed again and
    /// the socket, which the stack already released, is not closed.
    pub fn on_error(&mut self, id: ConnId, err: TransportError) {
        let Some(index) = self.current(id, "error") else {
            return;
        };

        warn!("connection {}: transport error: {:?}", index, err);
        self.slots[index].abort();
        self.tasks[index].as_mut().set(None);
    }

    /// True while the connection identified by `id` is being served
    pub fn is_open(&self, id: ConnId) -> bool {
        self.current(id, "query").is_some()
    }

    /// Number of slots in use
    pub fn active_connections(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_free()).count()
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[allow(missing_docs)]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Slot index for `id`, `None` for events of connections that are gone
    fn current(&self, id: ConnId, event: &str) -> Option<usize> {
        let index = usize::from(id.index);
        match self.slots.get(index) {
            Some(slot) if slot.is_current(id.generation) => Some(index),
            _ => {
                debug!("connection {}: ignoring {} event of a closed connection", id.index, event);
                None
            }
        }
    }

    fn resume(&mut self, index: usize) {
        if self.slots[index].is_exited() {
            warn!("connection {}: refusing to run a dead connection", index);
            return;
        }

        if coroutine::resume(self.tasks[index].as_mut()) == Resumed::Finished {
            trace!("connection {}: task finished", index);
        }
    }
}
