mod hit;
mod interaction;
mod model;
mod persist;
