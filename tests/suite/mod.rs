mod config;
mod judge;
mod session_flow;
