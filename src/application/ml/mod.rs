pub mod onnx;
pub mod predictor;
