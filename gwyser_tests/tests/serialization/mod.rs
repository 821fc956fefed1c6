mod boxed;
mod garbage;
mod golden;
mod round_trip;
