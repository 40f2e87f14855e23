//! Tests for clip playback and bone matrix composition
mod common;

use common::*;
use nalgebra_glm as glm;
use stride::{
    animation::{
        Animator, Bone, BoneTrack, Channel, Clip, ClipStore, Interpolation,
        Keyframe, Skeleton, Transform,
    },
    st_error::StError,
    util,
};

#[test]
fn update_without_clip_is_an_error() {
    init_tests();
    let (store, _) = store();
    let mut animator = Animator::new(&store);
    let result = animator.update_animation(&store, 0.1);
    assert!(matches!(result, Err(StError::NoActiveClip)));
    // Matrices are untouched
    assert!(animator
        .get_final_bone_matrices()
        .iter()
        .all(|m| *m == glm::Mat4::identity()));
}

#[test]
fn unknown_clip_is_rejected() {
    init_tests();
    let (store, handles) = store();
    // A handle from a bigger store that this store doesn't have
    let (mut bigger, _) = common::store();
    let extra = bounce_clip("Extra", bigger.skeleton(), 1.0, 2.0);
    let other = bigger.insert(extra).unwrap();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handles.running).unwrap();
    let result = animator.play_animation(&store, other);
    assert!(matches!(result, Err(StError::InvalidArgument)));
    assert_eq!(animator.active_clip(), Some(handles.running));
}

#[test]
fn time_stays_inside_clip() {
    init_tests();
    let (store, handles) = store();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handles.jumping).unwrap();
    for i in 0..500 {
        #[allow(clippy::cast_precision_loss)]
        let dt = 0.013 * (i % 7) as f32 + 0.001;
        animator.update_animation(&store, dt).unwrap();
        let t = animator.current_time();
        assert!((0.0..JUMP_DURATION).contains(&t), "time {t} dt {dt}");
    }
}

#[test]
fn time_wraps_at_duration() {
    init_tests();
    let (store, handles) = store();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handles.running).unwrap();
    for _ in 0..3 {
        animator.update_animation(&store, 0.25).unwrap();
    }
    assert!((animator.current_time() - 0.75).abs() < EPSILON);
    animator.update_animation(&store, 0.25).unwrap();
    assert!(animator.current_time().abs() < EPSILON);
    animator.update_animation(&store, 0.25).unwrap();
    assert!((animator.current_time() - 0.25).abs() < EPSILON);
}

#[test]
fn negative_dt_does_not_rewind() {
    init_tests();
    let (store, handles) = store();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handles.running).unwrap();
    animator.update_animation(&store, 0.5).unwrap();
    animator.update_animation(&store, -0.2).unwrap();
    assert!((animator.current_time() - 0.5).abs() < EPSILON);
}

#[test]
fn play_rewinds() {
    init_tests();
    let (store, handles) = store();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handles.running).unwrap();
    animator.update_animation(&store, 0.6).unwrap();
    animator.play_animation(&store, handles.sliding).unwrap();
    assert!(animator.current_time().abs() < EPSILON);
    assert_eq!(animator.active_clip(), Some(handles.sliding));
}

#[test]
fn one_matrix_per_bone() {
    init_tests();
    let (store, handles) = store();
    let mut animator = Animator::new(&store);
    assert_eq!(animator.get_final_bone_matrices().len(), 3);
    animator.play_animation(&store, handles.running).unwrap();
    animator.update_animation(&store, 0.1).unwrap();
    assert_eq!(
        animator.get_final_bone_matrices().len(),
        store.skeleton().bone_count()
    );
    assert_eq!(animator.final_bone_bytes().len(), 64 * 3);
}

#[test]
fn parents_are_applied_before_children() {
    init_tests();
    let (store, handles) = store();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handles.running).unwrap();
    // Halfway through the run the hips are at their highest, y=1.2
    animator.update_animation(&store, 0.5).unwrap();
    let matrices = animator.get_final_bone_matrices();

    let hips = util::translation_of(&matrices[1]);
    assert_vec3_eq(&hips, &glm::vec3(0.0, 1.2, 0.0));
    // Spine is stored before its parent and has an inverse bind of -1.5
    let spine = util::translation_of(&matrices[0]);
    assert_vec3_eq(&spine, &glm::vec3(0.0, 0.2, 0.0));
    // Head inherits both ancestors but not the spine's inverse bind
    let head = util::translation_of(&matrices[2]);
    assert_vec3_eq(&head, &glm::vec3(0.0, 1.95, 0.0));
}

#[test]
fn final_matrix_is_global_times_inverse_bind() {
    init_tests();
    let (store, handles) = store();
    let skeleton = store.skeleton();
    let clip = store.get(handles.jumping).unwrap();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handles.jumping).unwrap();
    animator.update_animation(&store, 0.7).unwrap();

    let locals = clip.sample(skeleton, animator.current_time());
    let global = |mut index: usize| {
        let bones = skeleton.bones();
        let mut m = bones[index].parent_offset * locals[index].to_mat4();
        while let Some(parent) = bones[index].parent {
            m = bones[parent].parent_offset * locals[parent].to_mat4() * m;
            index = parent;
        }
        skeleton.root_transform() * m
    };
    for (index, bone) in skeleton.bones().iter().enumerate() {
        let expected = global(index) * bone.inv_bind;
        let actual = animator.get_final_bone_matrices()[index];
        let diff = (expected - actual).abs().max();
        assert!(
            diff < EPSILON,
            "bone {} expected {:?} got {:?}",
            bone.name,
            expected,
            actual
        );
    }
}

#[test]
fn zero_length_clip_holds_first_pose() {
    init_tests();
    let (mut store, _) = store();
    let hips = BoneTrack {
        translation: Some(Channel::new(
            Interpolation::Linear,
            vec![Keyframe {
                time: 0.0,
                data: glm::vec3(0.0, 5.0, 0.0),
            }],
        )),
        ..Default::default()
    };
    let still = Clip::new(
        "Still",
        store.skeleton(),
        1.0,
        None,
        [("Hips".to_string(), hips)],
    )
    .unwrap();
    assert!(still.duration().abs() < EPSILON);
    let handle = store.insert(still).unwrap();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handle).unwrap();
    animator.update_animation(&store, 0.4).unwrap();
    assert!(animator.current_time().abs() < EPSILON);
    let hips = util::translation_of(&animator.get_final_bone_matrices()[1]);
    assert_vec3_eq(&hips, &glm::vec3(0.0, 5.0, 0.0));
}

#[test]
fn parent_offset_sits_between_bones() {
    init_tests();
    let offset =
        glm::translate(&glm::Mat4::identity(), &glm::vec3(0.0, 1.0, 0.0));
    let bones = vec![
        Bone {
            name: "Hips".to_string(),
            parent: None,
            parent_offset: glm::Mat4::identity(),
            bind: Transform::default(),
            inv_bind: glm::Mat4::identity(),
        },
        Bone {
            name: "Spine".to_string(),
            parent: Some(0),
            parent_offset: glm::rotate_z(&offset, std::f32::consts::FRAC_PI_2),
            bind: Transform {
                translation: glm::vec3(1.0, 0.0, 0.0),
                ..Default::default()
            },
            inv_bind: glm::Mat4::identity(),
        },
    ];
    let skeleton = Skeleton::new("offset", bones).unwrap();
    let no_tracks: Vec<(String, BoneTrack)> = Vec::new();
    let idle =
        Clip::new("Idle", &skeleton, 1.0, Some(1.0), no_tracks).unwrap();
    let mut store = ClipStore::new(skeleton);
    let handle = store.insert(idle).unwrap();
    let mut animator = Animator::new(&store);
    animator.play_animation(&store, handle).unwrap();
    animator.update_animation(&store, 0.25).unwrap();
    // The offset moves up one and turns +x onto +y before the local
    // translation applies
    let spine = util::translation_of(&animator.get_final_bone_matrices()[1]);
    assert_vec3_eq(&spine, &glm::vec3(0.0, 2.0, 0.0));
}
