pub mod match_runner_reqwest;
