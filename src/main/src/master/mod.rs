pub mod dispatcher;
pub mod m_http_handler;
pub mod m_region_master;
