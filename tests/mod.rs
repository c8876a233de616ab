mod message_tests;
mod poller_tests;
mod transport_tests;
