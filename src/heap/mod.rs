mod fibonacci;

pub use fibonacci::FibonacciHeap;
pub use fibonacci::Handle;
pub use fibonacci::MAX_DEGREE;
