pub mod testcase_generation;
