mod scaler;
