mod output;
mod python;

pub use output::Output;
pub use python::PydanticGenerator;
