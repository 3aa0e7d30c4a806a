pub mod navigator_sm;
