// The event-loop layer: the reactor, its mailbox, and the subscriber events.

mod event_loop;
mod mailbox;
mod reactor_event;

pub use self::{
    event_loop::{ReactorEventLoop, ReactorHandle},
    mailbox::ReactorMailBox,
    reactor_event::ReactorEvent,
};
