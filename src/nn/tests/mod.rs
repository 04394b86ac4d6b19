mod callbacks;
mod criterion;
