#![expect(missing_docs, reason = "test")]

mod common;

use picolink_net_api::net::udp::test_suite;
use picolink_net_std::net::udp::UdpTransport;

fn transport() -> UdpTransport {
    common::init_tracing();
    UdpTransport::new()
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_send_recv_v4() {
    test_suite::test_send_recv(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_send_recv_v6() {
    test_suite::test_send_recv(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_send_to_self_v4() {
    test_suite::test_send_to_self(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_send_to_self_v6() {
    test_suite::test_send_to_self(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_read_exact_across_datagrams_v4() {
    test_suite::test_read_exact_across_datagrams(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_read_exact_across_datagrams_v6() {
    test_suite::test_read_exact_across_datagrams(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_legacy_timeout_is_microseconds_v4() {
    test_suite::test_legacy_timeout_is_microseconds(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_legacy_timeout_is_microseconds_v6() {
    test_suite::test_legacy_timeout_is_microseconds(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_millisecond_timeout_v4() {
    test_suite::test_millisecond_timeout(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_millisecond_timeout_v6() {
    test_suite::test_millisecond_timeout(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_use_after_close_v4() {
    test_suite::test_use_after_close(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn udp_use_after_close_v6() {
    test_suite::test_use_after_close(transport(), "::1");
}
