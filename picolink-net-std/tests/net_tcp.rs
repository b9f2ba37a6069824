#![expect(missing_docs, reason = "test")]

mod common;

use picolink_net_api::net::tcp::test_suite;
use picolink_net_std::TransportConfig;
use picolink_net_std::net::resolve::Resolver;
use picolink_net_std::net::tcp::TcpTransport;

fn transport() -> TcpTransport {
    common::init_tracing();
    TcpTransport::new(&TransportConfig::default())
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_ping_pong_v4() {
    test_suite::test_ping_pong(transport(), Resolver::new(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_ping_pong_v6() {
    test_suite::test_ping_pong(transport(), Resolver::new(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_read_exact_fragmented_v4() {
    test_suite::test_read_exact_fragmented(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_read_exact_fragmented_v6() {
    test_suite::test_read_exact_fragmented(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_read_exact_peer_closed_v4() {
    test_suite::test_read_exact_peer_closed(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_read_exact_peer_closed_v6() {
    test_suite::test_read_exact_peer_closed(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_read_zero_on_peer_close_v4() {
    test_suite::test_read_zero_on_peer_close(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_read_zero_on_peer_close_v6() {
    test_suite::test_read_zero_on_peer_close(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_fallback_to_later_candidate_v4() {
    test_suite::test_fallback_to_later_candidate(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_fallback_to_later_candidate_v6() {
    test_suite::test_fallback_to_later_candidate(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_first_candidate_wins_v4() {
    test_suite::test_first_candidate_wins(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_first_candidate_wins_v6() {
    test_suite::test_first_candidate_wins(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_all_candidates_refused_v4() {
    test_suite::test_all_candidates_refused(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_all_candidates_refused_v6() {
    test_suite::test_all_candidates_refused(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_use_after_close_v4() {
    test_suite::test_use_after_close(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_use_after_close_v6() {
    test_suite::test_use_after_close(transport(), "::1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_send_to_closed_peer_v4() {
    test_suite::test_send_to_closed_peer(transport(), "127.0.0.1");
}

#[test]
#[ntest_timeout::timeout(10000)]
fn tcp_send_to_closed_peer_v6() {
    test_suite::test_send_to_closed_peer(transport(), "::1");
}
