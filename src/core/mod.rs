pub mod levels;
pub mod pnl;
pub mod position_sizer;
