use super::Tensor;
use std::ops::{Index, IndexMut};

// 引用式索引：`tensor[[i, j]]`
macro_rules! impl_fixed_index {
    ($($n:literal),*) => {
        $(
            impl Index<[usize; $n]> for Tensor {
                type Output = f32;

                fn index(&self, index: [usize; $n]) -> &f32 {
                    &self.data[&index[..]]
                }
            }

            impl IndexMut<[usize; $n]> for Tensor {
                fn index_mut(&mut self, index: [usize; $n]) -> &mut f32 {
                    &mut self.data[&index[..]]
                }
            }
        )*
    };
}

impl_fixed_index!(1, 2, 3);
