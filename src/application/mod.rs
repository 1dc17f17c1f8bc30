pub mod blog_service;
pub mod cart_service;
pub mod catalog_service;
pub mod invoice_service;
