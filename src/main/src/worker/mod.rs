pub mod m_http_handler;
pub mod m_region_cache;
pub mod region_create_function;
