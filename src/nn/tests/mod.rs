mod graph_basic;
mod layer_dcgru;
mod layer_diffusion;
mod layer_linear;
mod model_state;
mod var_shape_ops;
