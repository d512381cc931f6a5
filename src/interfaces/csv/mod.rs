pub mod event_reader;
pub mod loan_writer;
