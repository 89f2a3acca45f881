// tests/resolver_test.rs
use grelly::config::{BasePolicy, Config};
use grelly::domain::{Field, Source, Version};
use grelly::git::MockRepository;
use grelly::resolver::VersionResolver;
use grelly::warning::ResolutionWarning;
use grelly::GrellyError;

fn resolver() -> VersionResolver {
    VersionResolver::from_config(&Config::default()).unwrap()
}

#[test]
fn test_untagged_history_counts_all_ancestors() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    let a = repo.commit("a", &[root]);
    let b = repo.commit("b", &[root]);
    repo.commit("merge", &[a, b]);
    repo.set_branch(Some("feature/login"));

    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.version, Version::new(0, 0, 4));
    assert!(resolved.base.is_none());
}

#[test]
fn test_single_root_commit_is_patch_one() {
    let mut repo = MockRepository::new();
    repo.commit("init", &[]);

    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.to_string(), "0.0.1");
}

#[test]
fn test_tag_at_head_yields_patch_zero() {
    let mut repo = MockRepository::new();
    let head = repo.linear(None, 6);
    repo.add_tag("v2.3", head);

    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.to_string(), "2.3.0");
    assert_eq!(resolved.major_source, Source::Tag);
}

#[test]
fn test_descendants_count_commits_since_tag() {
    let mut repo = MockRepository::new();
    let tagged = repo.linear(None, 2);
    repo.add_tag("v2.3", tagged);

    let mut tip = tagged;
    for k in 1..=4u64 {
        tip = repo.commit("work", &[tip]);
        let resolved = resolver().resolve(&repo).unwrap();
        assert_eq!(resolved.version, Version::new(2, 3, k));
        assert_eq!(resolved.head, tip);
    }
}

#[test]
fn test_branch_overrides_tag_and_counts_from_tag() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    let tagged = repo.commit("ship", &[root]);
    repo.add_tag("v2.3", tagged);
    repo.linear(Some(tagged), 3);
    repo.set_branch(Some("release/5.0"));

    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.version, Version::new(5, 0, 3));
    assert_eq!(resolved.major_source, Source::Branch);
    assert_eq!(resolved.minor_source, Source::Branch);
    assert_eq!(resolved.base_commit(), Some(tagged));
    assert!(resolved.warnings.is_empty());
}

#[test]
fn test_diamond_merge_counts_each_commit_once() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    let tagged = repo.commit("tagged side", &[root]);
    repo.add_tag("v1.1", tagged);
    let side = repo.commit("side work", &[tagged]);
    let main1 = repo.commit("main work 1", &[root]);
    let main2 = repo.commit("main work 2", &[main1]);
    repo.commit("merge", &[main2, side]);

    // not reachable from the tag: side, main1, main2, merge
    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.version, Version::new(1, 1, 4));
    assert_eq!(resolved.base_commit(), Some(tagged));
}

#[test]
fn test_patch_never_decreases_along_descendants() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    repo.add_tag("v3.2", root);

    let mut last = 0;
    let mut tip = root;
    for i in 0..5 {
        let side = repo.commit(&format!("side {}", i), &[tip]);
        tip = repo.commit(&format!("merge {}", i), &[tip, side]);
        let patch = resolver().resolve(&repo).unwrap().version.patch;
        assert!(patch > last);
        last = patch;
    }
}

#[test]
fn test_patch_never_decreases_past_a_merge_of_unequal_sides() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    let long_side = repo.linear(Some(root), 10);
    let released = repo.commit("release work", &[long_side]);
    repo.add_tag("2.3.0", released);
    let short_side = repo.commit("hotfix", &[root]);
    repo.add_tag("v2.3", short_side);
    let merged = repo.commit("merge", &[short_side, released]);

    // v2.3 is one hop away but 12 commits behind; 2.3.0 is only 2 behind
    let at_merge = resolver().resolve(&repo).unwrap();
    assert_eq!(at_merge.version, Version::new(2, 3, 2));
    assert_eq!(at_merge.base_commit(), Some(released));

    let work = repo.commit("follow-up", &[released]);
    repo.commit("merge again", &[work, merged]);

    let descendant = resolver().resolve(&repo).unwrap();
    assert_eq!(descendant.version, Version::new(2, 3, 4));
    assert!(descendant.version.patch >= at_merge.version.patch);
}

#[test]
fn test_nearest_tag_ignores_parent_order() {
    let build = |tagged_first: bool| {
        let mut repo = MockRepository::new();
        let root = repo.commit("init", &[]);
        let a = repo.linear(Some(root), 3);
        repo.add_tag("v1.0", a);
        let b = repo.commit("b", &[root]);
        repo.add_tag("v1.5", b);
        let parents = if tagged_first { [a, b] } else { [b, a] };
        repo.commit("merge", &parents);
        repo
    };

    // both tags sit directly behind the merge; v1.0 has fewer commits since
    for tagged_first in [true, false] {
        let resolved = resolver().resolve(&build(tagged_first)).unwrap();
        assert_eq!(resolved.version, Version::new(1, 0, 2));
        assert_eq!(resolved.major_source, Source::Tag);
    }
}

#[test]
fn test_equally_distant_tags_pick_higher_version() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    let a = repo.commit("a", &[root]);
    repo.add_tag("v1.0", a);
    let b = repo.commit("b", &[root]);
    repo.add_tag("v1.5", b);
    repo.commit("merge", &[a, b]);

    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.version, Version::new(1, 5, 2));
    assert_eq!(resolved.base_commit(), Some(b));
}

#[test]
fn test_branch_base_uses_fewest_commits_since() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    let long_side = repo.linear(Some(root), 5);
    repo.add_tag("v3.1", long_side);
    let short_side = repo.commit("fix", &[root]);
    repo.add_tag("v3.0", short_side);
    repo.commit("merge", &[short_side, long_side]);
    repo.set_branch(Some("release/3.2"));

    // v3.0: 6 commits since (5 on the long side plus the merge); v3.1: 2
    for policy in [BasePolicy::NearestAtOrBelow, BasePolicy::Nearest] {
        let resolved = resolver()
            .with_base_policy(policy)
            .resolve(&repo)
            .unwrap();
        assert_eq!(resolved.version, Version::new(3, 2, 2));
        assert_eq!(resolved.base_commit(), Some(long_side));
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let build = || {
        let mut repo = MockRepository::new();
        let root = repo.commit("release: 1.4.0", &[]);
        let a = repo.commit("a", &[root]);
        let b = repo.commit("b", &[root]);
        repo.add_tag("v1.5", b);
        repo.commit("merge", &[a, b]);
        repo.set_branch(Some("release/2"));
        repo
    };

    let first = resolver().resolve(&build()).unwrap();
    let second = resolver().resolve(&build()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_branch_major_only_with_disagreeing_markers_warns() {
    let mut repo = MockRepository::new();
    let root = repo.commit("release: 4.1.0", &[]);
    let tagged = repo.commit("work", &[root]);
    repo.add_tag("v4.2", tagged);
    repo.commit("more", &[tagged]);
    repo.set_branch(Some("release/4"));

    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.version, Version::new(4, 2, 1));
    assert_eq!(resolved.minor_source, Source::Tag);
    assert_eq!(
        resolved.warnings,
        vec![ResolutionWarning::SignalDisagreement {
            field: Field::Minor,
            chosen: 2,
            chosen_from: Source::Tag,
            ignored: 1,
            ignored_from: Source::ReleaseCommit,
        }]
    );
    assert!(resolved.warnings[0].to_string().starts_with("Ambiguous"));
}

#[test]
fn test_detached_head_has_no_branch_signal() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    repo.add_tag("v0.9", root);
    repo.commit("work", &[root]);
    repo.set_branch(None);

    let resolved = resolver().resolve(&repo).unwrap();
    assert_eq!(resolved.version, Version::new(0, 9, 1));
}

#[test]
fn test_unborn_head_is_repository_error() {
    let repo = MockRepository::new();
    let err = resolver().resolve(&repo).unwrap_err();
    assert!(err.is_repository_access());
}

#[test]
fn test_malformed_pattern_is_config_error() {
    let mut config = Config::default();
    config.patterns.tag = "v<major".to_string();

    let err = VersionResolver::from_config(&config).unwrap_err();
    assert!(matches!(err, GrellyError::Config(_)));
}

#[test]
fn test_custom_patterns() {
    let mut repo = MockRepository::new();
    let root = repo.commit("init", &[]);
    repo.add_tag("rel-7.3", root);
    repo.add_tag("v9.9", root);
    repo.commit("work", &[root]);
    repo.set_branch(Some("stable-8.x"));

    let mut config = Config::default();
    config.patterns.tag = "rel-<major>.<minor>".to_string();
    config.patterns.branch = "stable-<major>.x".to_string();
    config.resolution.base_policy = BasePolicy::Nearest;

    let resolved = VersionResolver::from_config(&config)
        .unwrap()
        .resolve(&repo)
        .unwrap();
    assert_eq!(resolved.version, Version::new(8, 3, 1));
    assert_eq!(resolved.major_source, Source::Branch);
    assert_eq!(resolved.minor_source, Source::Tag);
}
