#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod rest;

pub use rest::{DEFAULT_BASE_URL, REST, ReqwestSendRequest, SendRequest};

#[cfg(test)]
mod tests {
    pub mod data;
}
