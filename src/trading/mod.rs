pub mod analytics;
pub mod daily_lock;
pub mod desk;
pub mod journal;
pub mod review;
pub mod session;
pub mod trade_record;
