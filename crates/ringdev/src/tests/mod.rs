mod options;
mod spans;
