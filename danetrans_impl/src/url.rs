//! The `scheme://host[:port]/path?query` form used to wire up clients.

mod url_info;
mod url_resolver;

pub use self::{
    url_info::{UrlInfo, UrlScheme},
    url_resolver::UrlResolver,
};
