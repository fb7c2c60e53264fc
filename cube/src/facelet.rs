use crate::action::{Action, Face, ACTION_COUNT};

pub const FACELET_COUNT: usize = 54;
pub const FACELETS_PER_FACE: usize = 9;

type Vec3 = [i8; 3];

lazy_static! {
    /// (position, outward normal) of every facelet, in index order.
    static ref FACELETS: Vec<(Vec3, Vec3)> = generate_facelets();
    pub(crate) static ref PERMUTATIONS: [[u8; FACELET_COUNT]; ACTION_COUNT] = generate_permutations();
    pub(crate) static ref SOLVED: [u8; FACELET_COUNT] = generate_solved();
    pub(crate) static ref FACE_FACELETS: [[u8; FACELETS_PER_FACE]; 6] = generate_face_facelets();
}

fn generate_facelets() -> Vec<(Vec3, Vec3)> {
    let mut facelets = Vec::with_capacity(FACELET_COUNT);
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                let position = [x, y, z];
                for axis in 0..3 {
                    if position[axis] != 0 {
                        let mut normal = [0; 3];
                        normal[axis] = position[axis];
                        facelets.push((position, normal));
                    }
                }
            }
        }
    }
    assert_eq!(facelets.len(), FACELET_COUNT);
    facelets
}

fn dot(a: Vec3, b: Vec3) -> i8 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Quarter turn of `v` around `axis`.
/// Clockwise is seen from the tip of the axis, i.e. a rotation by -90 degrees.
fn rotate(v: Vec3, axis: Vec3, clockwise: bool) -> Vec3 {
    // R(v) = u (u . v) + sin(theta) (u x v) for theta = +-90 degrees
    let parallel = dot(axis, v);
    let perpendicular = cross(axis, v);
    let sin = if clockwise { -1 } else { 1 };
    [
        axis[0] * parallel + sin * perpendicular[0],
        axis[1] * parallel + sin * perpendicular[1],
        axis[2] * parallel + sin * perpendicular[2],
    ]
}

fn facelet_index(facelet: (Vec3, Vec3)) -> usize {
    FACELETS
        .iter()
        .position(|f| *f == facelet)
        .expect("rotated facelet must exist")
}

fn generate_permutations() -> [[u8; FACELET_COUNT]; ACTION_COUNT] {
    Action::ALL.map(|action| {
        let axis = action.face.normal();
        let mut permutation = [0; FACELET_COUNT];
        for (i, &(position, normal)) in FACELETS.iter().enumerate() {
            permutation[i] = if dot(position, axis) == 1 {
                let moved = (rotate(position, axis, action.clockwise), rotate(normal, axis, action.clockwise));
                facelet_index(moved) as u8
            } else {
                i as u8
            };
        }
        permutation
    })
}

fn face_of_normal(normal: Vec3) -> Face {
    Face::ALL
        .into_iter()
        .find(|face| face.normal() == normal)
        .expect("every normal belongs to a face")
}

fn generate_solved() -> [u8; FACELET_COUNT] {
    let mut solved = [0; FACELET_COUNT];
    for (colour, &(_, normal)) in solved.iter_mut().zip(FACELETS.iter()) {
        *colour = face_of_normal(normal) as u8;
    }
    solved
}

fn generate_face_facelets() -> [[u8; FACELETS_PER_FACE]; 6] {
    Face::ALL.map(|face| {
        let mut indices = [0; FACELETS_PER_FACE];
        let mut found = FACELETS
            .iter()
            .enumerate()
            .filter(|(_, (_, normal))| *normal == face.normal())
            .map(|(i, _)| i as u8);
        for index in indices.iter_mut() {
            *index = found.next().expect("every face has nine facelets");
        }
        indices
    })
}
