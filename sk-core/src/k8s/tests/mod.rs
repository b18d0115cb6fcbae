mod quantity_test;

use rstest::*;

use super::*;
