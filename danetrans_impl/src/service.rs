// The thin dispatch layer on top of the core: worker body on the server side,
// request facade on the client side.

mod trans_client;
mod trans_server;
mod trans_service;

pub use self::{
    trans_client::TransClient,
    trans_server::TransServer,
    trans_service::{RequestHandler, TransService},
};
