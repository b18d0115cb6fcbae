
use rstest::*;
use sk_core::k8s::testutils::*;
use sk_core::prelude::*;
