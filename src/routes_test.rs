use super::*;
use std::sync::atomic::{AtomicBool, Ordering};

struct FixedAuth(AtomicBool);

impl FixedAuth {
    fn signed_in() -> Self {
        Self(AtomicBool::new(true))
    }

    fn signed_out() -> Self {
        Self(AtomicBool::new(false))
    }
}

impl AuthView for FixedAuth {
    fn is_authenticated(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// guards
// =============================================================================

#[test]
fn auth_guard_allows_signed_in_without_navigation() {
    let router = Router::new();
    assert_eq!(require_auth(&FixedAuth::signed_in(), &router), Access::Allow);
    assert!(router.history().is_empty());
}

#[test]
fn auth_guard_redirects_signed_out_to_login() {
    let router = Router::new();
    assert_eq!(require_auth(&FixedAuth::signed_out(), &router), Access::Deny);
    assert_eq!(router.history(), vec![LOGIN_ROUTE]);
}

#[test]
fn guest_guard_allows_signed_out() {
    let router = Router::new();
    assert_eq!(require_guest(&FixedAuth::signed_out(), &router), Access::Allow);
    assert!(router.history().is_empty());
}

#[test]
fn guest_guard_redirects_signed_in_to_cars() {
    let router = Router::new();
    assert_eq!(require_guest(&FixedAuth::signed_in(), &router), Access::Deny);
    assert_eq!(router.location().as_deref(), Some(HOME_ROUTE));
}

#[test]
fn guards_are_repeatable() {
    let router = Router::new();
    let auth = FixedAuth::signed_out();
    for _ in 0..3 {
        assert_eq!(Guard::Authenticated.check(&auth, &router), Access::Deny);
        assert_eq!(Guard::GuestOnly.check(&auth, &router), Access::Allow);
    }
    assert_eq!(router.history(), vec![LOGIN_ROUTE, LOGIN_ROUTE, LOGIN_ROUTE]);
}

// =============================================================================
// route table
// =============================================================================

#[test]
fn resolve_known_screens() {
    assert_eq!(resolve("/login"), Resolution::Screen(Screen::Login));
    assert_eq!(resolve("/register"), Resolution::Screen(Screen::Register));
    assert_eq!(resolve("/cars"), Resolution::Screen(Screen::CarList));
    assert_eq!(resolve("/cars/new"), Resolution::Screen(Screen::CarNew));
    assert_eq!(resolve("/cars/edit/abc123"), Resolution::Screen(Screen::CarEdit { id: "abc123".into() }));
    assert_eq!(resolve("/profile?tab=1"), Resolution::Screen(Screen::Profile));
}

#[test]
fn resolve_empty_and_unknown_redirect_home() {
    assert_eq!(resolve(""), Resolution::Redirect(HOME_ROUTE));
    assert_eq!(resolve("/"), Resolution::Redirect(HOME_ROUTE));
    assert_eq!(resolve("/nope/nothing"), Resolution::Redirect(HOME_ROUTE));
}

#[test]
fn screen_guards_match_route_table() {
    assert_eq!(Screen::Login.guard(), Guard::GuestOnly);
    assert_eq!(Screen::Register.guard(), Guard::GuestOnly);
    assert_eq!(Screen::CarNew.guard(), Guard::Authenticated);
    assert_eq!(Screen::CarEdit { id: "x".into() }.guard(), Guard::Authenticated);
    assert_eq!(Screen::Profile.guard(), Guard::Authenticated);
}

#[test]
fn screen_path_round_trips_through_resolve() {
    let screen = Screen::CarEdit { id: "42".into() };
    assert_eq!(resolve(&screen.path()), Resolution::Screen(screen));
}

// =============================================================================
// navigate_guarded
// =============================================================================

#[test]
fn navigate_guarded_allows_and_records_location() {
    let router = Router::new();
    let access = router.navigate_guarded("/cars/new", &FixedAuth::signed_in());
    assert_eq!(access, Access::Allow);
    assert_eq!(router.location().as_deref(), Some("/cars/new"));
}

#[test]
fn navigate_guarded_denied_lands_on_redirect() {
    let router = Router::new();
    let access = router.navigate_guarded("/profile", &FixedAuth::signed_out());
    assert_eq!(access, Access::Deny);
    assert_eq!(router.history(), vec![LOGIN_ROUTE]);
}

#[test]
fn navigate_guarded_unknown_path_goes_through_home_guard() {
    let router = Router::new();
    assert_eq!(router.navigate_guarded("/unknown", &FixedAuth::signed_in()), Access::Allow);
    assert_eq!(router.location().as_deref(), Some(HOME_ROUTE));

    let router = Router::new();
    assert_eq!(router.navigate_guarded("/unknown", &FixedAuth::signed_out()), Access::Deny);
    assert_eq!(router.location().as_deref(), Some(LOGIN_ROUTE));
}

#[test]
fn signed_in_user_visiting_login_is_sent_home() {
    let router = Router::new();
    assert_eq!(router.navigate_guarded("/login", &FixedAuth::signed_in()), Access::Deny);
    assert_eq!(router.location().as_deref(), Some(HOME_ROUTE));
}
