mod property;
mod shape;
