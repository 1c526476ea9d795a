mod common;

mod test_switch;
