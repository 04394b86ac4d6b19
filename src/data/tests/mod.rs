mod npy;
mod transforms;
