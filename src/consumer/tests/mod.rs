//! Unit tests for message classification and the consumer loop.
