/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的减法，实现了两个同形张量“逐元素”（或张量与纯数）相减的运算，并返回一个新的张量。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::{Neg, SubAssign};

impl_tensor_binary_op!(Sub, sub, -, Operator::Sub);

impl SubAssign<&Tensor> for Tensor {
    fn sub_assign(&mut self, rhs: &Tensor) {
        assert!(
            self.is_same_shape(rhs),
            "{}",
            TensorError::OperatorError {
                operator: Operator::SubAssign,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: rhs.shape().to_vec(),
            }
        );
        self.data -= &rhs.data;
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        Tensor {
            data: self.data.mapv(|x| -x),
        }
    }
}

impl Neg for Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        -&self
    }
}
