mod disk;
mod handler;
mod validator;

pub use handler::serve_file;
