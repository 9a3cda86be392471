mod customers;
mod step_timings;
