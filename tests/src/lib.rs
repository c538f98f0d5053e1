//! End-to-end tests for the gordo engine against real loopback sockets.

#[cfg(test)]
mod scanning;
