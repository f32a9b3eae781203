pub mod association_service;
