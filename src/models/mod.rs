pub mod test_record;
pub mod webhook_log;
