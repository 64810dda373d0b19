mod masked_mae_loss;
mod mse_loss;

pub(in crate::nn) use masked_mae_loss::MaskedMaeLoss;
pub(in crate::nn) use mse_loss::MseLoss;
