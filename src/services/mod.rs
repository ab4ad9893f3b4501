pub mod redistributor;
