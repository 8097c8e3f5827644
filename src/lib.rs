pub mod cli;
pub mod ctx;
pub mod io;
pub mod locations;
pub mod mem;
pub mod pipeline;
pub mod reshape;
pub mod schema;
pub mod store;
pub mod table;
pub mod tensor;
