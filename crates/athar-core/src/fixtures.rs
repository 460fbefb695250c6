//! Deterministic fixture data.
//!
//! Reference data (boxes, categories) carries explicit ids and is keyed by
//! them. Sample content refers to other fixtures by position in their slice;
//! the seeder resolves positions to generated primary keys at insert time.

use crate::value::Row;

/// Plaintext password shared by every sample user. Only ever hashed before
/// insertion and echoed to the operator.
pub const SAMPLE_PASSWORD: &str = "password123";

/// Plaintext password of the single test user
pub const TEST_USER_PASSWORD: &str = "test123456";

/// A topical box
#[derive(Debug, Clone, Copy)]
pub struct BoxFixture {
    pub id: i64,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub order_index: i64,
}

impl BoxFixture {
    pub fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("name", self.name)
            .with("description", self.description)
            .with("icon", self.icon)
            .with("color", self.color)
            .with("order_index", self.order_index)
    }
}

/// A category inside a box
#[derive(Debug, Clone, Copy)]
pub struct CategoryFixture {
    pub id: i64,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub box_id: i64,
    pub order_index: i64,
}

impl CategoryFixture {
    pub fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("name", self.name)
            .with("description", self.description)
            .with("icon", self.icon)
            .with("color", self.color)
            .with("box_id", self.box_id)
            .with("order_index", self.order_index)
    }
}

/// Role column values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// A sample user. The password hash is supplied by the seeder.
#[derive(Debug, Clone, Copy)]
pub struct UserFixture {
    pub phone: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub bio: &'static str,
    pub role: Role,
}

impl UserFixture {
    pub fn to_row(&self, password_hash: &str) -> Row {
        Row::new()
            .with("phone", self.phone)
            .with("name", self.name)
            .with("email", self.email)
            .with("password", password_hash)
            .with("bio", self.bio)
            .with("is_verified", true)
            .with("role", self.role.as_str())
    }
}

/// A sample text post, authored by `USERS[author]`
#[derive(Debug, Clone, Copy)]
pub struct PostFixture {
    pub author: usize,
    pub title: &'static str,
    pub content: &'static str,
    pub category: &'static str,
}

impl PostFixture {
    pub fn to_row(&self, user_id: u64) -> Row {
        Row::new()
            .with("user_id", user_id)
            .with("type", "text")
            .with("title", self.title)
            .with("content", self.content)
            .with("category", self.category)
    }
}

/// `USERS[user]` reacts to `POSTS[post]` (likes)
#[derive(Debug, Clone, Copy)]
pub struct LikeFixture {
    pub post: usize,
    pub user: usize,
}

/// `USERS[user]` comments on `POSTS[post]`
#[derive(Debug, Clone, Copy)]
pub struct CommentFixture {
    pub post: usize,
    pub user: usize,
    pub content: &'static str,
}

/// `USERS[follower]` follows `USERS[following]`
#[derive(Debug, Clone, Copy)]
pub struct FollowFixture {
    pub follower: usize,
    pub following: usize,
}

/// The single credentialed test account
#[derive(Debug, Clone, Copy)]
pub struct TestUserFixture {
    pub name: &'static str,
    pub email: &'static str,
    pub bio: &'static str,
}

impl TestUserFixture {
    pub fn to_row(&self, phone: &str, password_hash: &str) -> Row {
        Row::new()
            .with("phone", phone)
            .with("name", self.name)
            .with("email", self.email)
            .with("password", password_hash)
            .with("is_verified", true)
            .with("role", Role::User.as_str())
            .with("bio", self.bio)
    }
}

pub const TEST_USER: TestUserFixture = TestUserFixture {
    name: "مستخدم تجريبي",
    email: "test@athar.app",
    bio: "حساب تجريبي للتطوير",
};

#[rustfmt::skip]
pub const BOXES: &[BoxFixture] = &[
    BoxFixture { id: 1, name: "صندوق التقنية والبرمجة", description: "أحدث الأفكار والمشاريع في عالم التقنية والبرمجة والذكاء الاصطناعي", icon: "code-slash", color: "#3B82F6", order_index: 1 },
    BoxFixture { id: 2, name: "صندوق الفن والإبداع", description: "مساحة للفنانين والمبدعين لمشاركة أعمالهم وإلهام الآخرين", icon: "color-palette", color: "#8B5CF6", order_index: 2 },
    BoxFixture { id: 3, name: "صندوق الكتابة والأدب", description: "قصص وأفكار أدبية من كتّاب موهوبين حول العالم", icon: "book", color: "#10B981", order_index: 3 },
    BoxFixture { id: 4, name: "صندوق الرياضة واللياقة", description: "نصائح وتجارب رياضية لحياة صحية ونشطة", icon: "fitness", color: "#EF4444", order_index: 4 },
    BoxFixture { id: 5, name: "صندوق السفر والمغامرات", description: "تجارب سفر مذهلة ووجهات سياحية من حول العالم", icon: "airplane", color: "#F59E0B", order_index: 5 },
    BoxFixture { id: 6, name: "صندوق ريادة الأعمال", description: "أفكار ونصائح لرواد الأعمال والمشاريع الناشئة", icon: "briefcase", color: "#06B6D4", order_index: 6 },
];

#[rustfmt::skip]
pub const CATEGORIES: &[CategoryFixture] = &[
    CategoryFixture { id: 1, name: "برمجة", description: "مواضيع البرمجة والتطوير", icon: "code", color: "#3B82F6", box_id: 1, order_index: 1 },
    CategoryFixture { id: 2, name: "ذكاء اصطناعي", description: "الذكاء الاصطناعي والتعلم الآلي", icon: "bulb", color: "#8B5CF6", box_id: 1, order_index: 2 },
    CategoryFixture { id: 3, name: "تصميم", description: "التصميم الجرافيكي وتجربة المستخدم", icon: "brush", color: "#EC4899", box_id: 1, order_index: 3 },
    CategoryFixture { id: 4, name: "رسم", description: "الرسم والفنون التشكيلية", icon: "color-palette", color: "#8B5CF6", box_id: 2, order_index: 1 },
    CategoryFixture { id: 5, name: "موسيقى", description: "الموسيقى والفنون الصوتية", icon: "musical-notes", color: "#F59E0B", box_id: 2, order_index: 2 },
    CategoryFixture { id: 6, name: "تصوير", description: "التصوير الفوتوغرافي", icon: "camera", color: "#06B6D4", box_id: 2, order_index: 3 },
    CategoryFixture { id: 7, name: "شعر", description: "الشعر والقصائد", icon: "book", color: "#10B981", box_id: 3, order_index: 1 },
    CategoryFixture { id: 8, name: "قصص", description: "القصص القصيرة والروايات", icon: "library", color: "#3B82F6", box_id: 3, order_index: 2 },
    CategoryFixture { id: 9, name: "مقالات", description: "المقالات والكتابة الحرة", icon: "document-text", color: "#F59E0B", box_id: 3, order_index: 3 },
    CategoryFixture { id: 10, name: "كرة قدم", description: "كرة القدم والرياضات الجماعية", icon: "football", color: "#EF4444", box_id: 4, order_index: 1 },
    CategoryFixture { id: 11, name: "لياقة", description: "اللياقة البدنية والتمارين", icon: "fitness", color: "#10B981", box_id: 4, order_index: 2 },
    CategoryFixture { id: 12, name: "تغذية", description: "التغذية الصحية", icon: "nutrition", color: "#F59E0B", box_id: 4, order_index: 3 },
    CategoryFixture { id: 13, name: "سياحة", description: "السياحة والسفر", icon: "airplane", color: "#06B6D4", box_id: 5, order_index: 1 },
    CategoryFixture { id: 14, name: "مغامرات", description: "المغامرات والرحلات", icon: "compass", color: "#EF4444", box_id: 5, order_index: 2 },
    CategoryFixture { id: 15, name: "ثقافات", description: "الثقافات والتقاليد", icon: "globe", color: "#8B5CF6", box_id: 5, order_index: 3 },
    CategoryFixture { id: 16, name: "ريادة", description: "ريادة الأعمال والشركات الناشئة", icon: "rocket", color: "#06B6D4", box_id: 6, order_index: 1 },
    CategoryFixture { id: 17, name: "تسويق", description: "التسويق والمبيعات", icon: "megaphone", color: "#EC4899", box_id: 6, order_index: 2 },
    CategoryFixture { id: 18, name: "إدارة", description: "الإدارة والقيادة", icon: "briefcase", color: "#3B82F6", box_id: 6, order_index: 3 },
];

#[rustfmt::skip]
pub const USERS: &[UserFixture] = &[
    UserFixture { phone: "07701234567", name: "أحمد محمد", email: "ahmed@example.com", bio: "مطور تطبيقات | مهتم بالتقنية والبرمجة", role: Role::User },
    UserFixture { phone: "07712345678", name: "سارة الفنانة", email: "sara@example.com", bio: "فنانة تشكيلية | أحب الألوان المائية", role: Role::User },
    UserFixture { phone: "07723456789", name: "أحمد الكاتب", email: "ahmed.writer@example.com", bio: "كاتب وروائي | أحب القصص القصيرة", role: Role::User },
    UserFixture { phone: "07734567890", name: "محمد الرياضي", email: "mohamed@example.com", bio: "مدرب لياقة بدنية | نمط حياة صحي", role: Role::User },
    UserFixture { phone: "07745678901", name: "ليلى المسافرة", email: "layla@example.com", bio: "عاشقة السفر والمغامرات | 45 دولة", role: Role::User },
    UserFixture { phone: "07756789012", name: "خالد رائد الأعمال", email: "khaled@example.com", bio: "رائد أعمال | مؤسس 3 شركات ناشئة", role: Role::User },
    UserFixture { phone: "07767890123", name: "فاطمة المطورة", email: "fatima@example.com", bio: "مطورة Full Stack | React & Node.js", role: Role::User },
    UserFixture { phone: "07778901234", name: "عمر المصمم", email: "omar@example.com", bio: "مصمم جرافيك | UI/UX Designer", role: Role::User },
    UserFixture { phone: "07789012345", name: "مدير النظام", email: "admin@athar.com", bio: "مدير منصة أثر", role: Role::Admin },
];

#[rustfmt::skip]
pub const POSTS: &[PostFixture] = &[
    PostFixture { author: 0, title: "تجربتي في تعلم React Native", content: "بدأت رحلتي في تعلم React Native منذ شهرين، وأود مشاركة تجربتي معكم. التحديات كانت كثيرة في البداية، لكن المجتمع الداعم والموارد المتاحة ساعدتني كثيراً. أنصح المبتدئين بالتركيز على الأساسيات أولاً قبل الانتقال للمكتبات المتقدمة.", category: "تقنية" },
    PostFixture { author: 1, title: "لوحتي الجديدة - غروب الشمس", content: "لوحة جديدة رسمتها بالألوان المائية، مستوحاة من غروب الشمس على شاطئ البحر. استغرقت مني 3 أيام لإكمالها.", category: "فن" },
    PostFixture { author: 2, title: "قصة قصيرة: الطريق", content: "كان الطريق طويلاً، والليل حالكاً. سار وحيداً، لا يرافقه سوى صوت خطواته على الحصى. في نهاية الطريق، كان هناك نور خافت يلوح في الأفق، كأنه يدعوه للمضي قدماً...", category: "أدب" },
    PostFixture { author: 3, title: "روتيني الصباحي للياقة", content: "أشارك معكم روتيني الصباحي الذي ساعدني على خسارة 15 كيلو في 3 أشهر. التمارين بسيطة ولا تحتاج معدات!", category: "رياضة" },
    PostFixture { author: 4, title: "رحلتي إلى اليابان", content: "زيارة طوكيو كانت حلماً تحقق! المدينة مذهلة بتناقضاتها بين التقليد والحداثة. تجربة لا تُنسى.", category: "سفر" },
    PostFixture { author: 5, title: "5 دروس تعلمتها من فشل مشروعي الأول", content: "فشل مشروعي الأول كان أفضل معلم لي. تعلمت أهمية دراسة السوق، الاستماع للعملاء، وعدم الاستسلام. اليوم، مشروعي الثاني ينمو بشكل مستمر بفضل هذه الدروس.", category: "أعمال" },
    PostFixture { author: 6, title: "أفضل 10 مصادر لتعلم البرمجة مجاناً", content: "جمعت لكم أفضل المصادر المجانية لتعلم البرمجة من الصفر. هذه المواقع ساعدتني شخصياً في بداية مسيرتي.", category: "تقنية" },
    PostFixture { author: 7, title: "تصميم شعار جديد لمقهى محلي", content: "سعيد بمشاركة آخر أعمالي - تصميم هوية بصرية كاملة لمقهى محلي. التحدي كان في دمج الطابع التقليدي مع لمسة عصرية.", category: "فن" },
    PostFixture { author: 0, title: "نصائح لتحسين أداء تطبيقات React", content: "بعد سنوات من العمل مع React، جمعت أهم النصائح لتحسين الأداء: استخدام React.memo، تجنب Re-renders غير الضرورية، واستخدام lazy loading للمكونات الكبيرة.", category: "تقنية" },
    PostFixture { author: 1, title: "تقنيات الرسم بالألوان الزيتية", content: "الألوان الزيتية تتطلب صبراً وممارسة. أهم نصيحة: ابدأ بطبقات رقيقة واترك كل طبقة تجف قبل إضافة التالية.", category: "فن" },
    PostFixture { author: 3, title: "أهمية تمارين الإحماء", content: "تمارين الإحماء ليست اختيارية! 10 دقائق من الإحماء يمكن أن تمنع إصابات خطيرة وتحسن أداءك الرياضي بشكل كبير.", category: "رياضة" },
    PostFixture { author: 4, title: "نصائح للسفر بميزانية محدودة", content: "السفر لا يجب أن يكون مكلفاً! احجز مبكراً، استخدم تطبيقات المقارنة، وفكر في الإقامة في نُزل بدلاً من الفنادق.", category: "سفر" },
];

#[rustfmt::skip]
pub const LIKES: &[LikeFixture] = &[
    LikeFixture { post: 0, user: 1 },
    LikeFixture { post: 0, user: 2 },
    LikeFixture { post: 0, user: 3 },
    LikeFixture { post: 1, user: 0 },
    LikeFixture { post: 1, user: 2 },
    LikeFixture { post: 1, user: 4 },
    LikeFixture { post: 2, user: 1 },
    LikeFixture { post: 2, user: 5 },
    LikeFixture { post: 3, user: 0 },
    LikeFixture { post: 3, user: 2 },
    LikeFixture { post: 3, user: 4 },
    LikeFixture { post: 3, user: 6 },
    LikeFixture { post: 4, user: 1 },
    LikeFixture { post: 4, user: 3 },
    LikeFixture { post: 4, user: 5 },
];

#[rustfmt::skip]
pub const COMMENTS: &[CommentFixture] = &[
    CommentFixture { post: 0, user: 1, content: "مقال رائع! أنا أيضاً أتعلم React Native حالياً" },
    CommentFixture { post: 0, user: 2, content: "شكراً على المشاركة، نصائح مفيدة جداً" },
    CommentFixture { post: 1, user: 0, content: "اللوحة جميلة جداً! أحب الألوان" },
    CommentFixture { post: 1, user: 3, content: "إبداع حقيقي، استمري" },
    CommentFixture { post: 2, user: 4, content: "قصة مؤثرة، متى سنقرأ المزيد؟" },
    CommentFixture { post: 3, user: 5, content: "هل يمكنك مشاركة تفاصيل الروتين؟" },
    CommentFixture { post: 4, user: 6, content: "اليابان على قائمتي! أي نصائح؟" },
    CommentFixture { post: 5, user: 7, content: "دروس قيمة، شكراً على الصراحة" },
];

#[rustfmt::skip]
pub const FOLLOWS: &[FollowFixture] = &[
    FollowFixture { follower: 0, following: 1 },
    FollowFixture { follower: 0, following: 2 },
    FollowFixture { follower: 1, following: 0 },
    FollowFixture { follower: 1, following: 3 },
    FollowFixture { follower: 2, following: 0 },
    FollowFixture { follower: 2, following: 4 },
    FollowFixture { follower: 3, following: 1 },
    FollowFixture { follower: 4, following: 2 },
    FollowFixture { follower: 5, following: 0 },
    FollowFixture { follower: 6, following: 1 },
];

/// Phones of the accounts whose credentials are echoed after seeding
pub fn echoed_accounts() -> impl Iterator<Item = &'static UserFixture> {
    let first_user = USERS.iter().find(|u| u.role == Role::User);
    let admin = USERS.iter().find(|u| u.role == Role::Admin);
    first_user.into_iter().chain(admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;
    use std::collections::HashSet;

    #[test]
    fn test_sample_user_counts() {
        assert_eq!(USERS.len(), 9);
        let admins = USERS.iter().filter(|u| u.role == Role::Admin).count();
        assert_eq!(admins, 1);
    }

    #[test]
    fn test_reference_data_counts() {
        assert_eq!(BOXES.len(), 6);
        assert_eq!(CATEGORIES.len(), 18);
        assert_eq!(POSTS.len(), 12);
        assert_eq!(LIKES.len(), 15);
        assert_eq!(COMMENTS.len(), 8);
        assert_eq!(FOLLOWS.len(), 10);
    }

    #[test]
    fn test_positions_resolve() {
        assert!(POSTS.iter().all(|p| p.author < USERS.len()));
        assert!(LIKES
            .iter()
            .all(|l| l.post < POSTS.len() && l.user < USERS.len()));
        assert!(COMMENTS
            .iter()
            .all(|c| c.post < POSTS.len() && c.user < USERS.len()));
        assert!(FOLLOWS
            .iter()
            .all(|f| f.follower < USERS.len() && f.following < USERS.len()));
    }

    #[test]
    fn test_natural_keys_are_unique() {
        let phones: HashSet<_> = USERS.iter().map(|u| u.phone).collect();
        assert_eq!(phones.len(), USERS.len());
        let likes: HashSet<_> = LIKES.iter().map(|l| (l.post, l.user)).collect();
        assert_eq!(likes.len(), LIKES.len());
        let follows: HashSet<_> = FOLLOWS.iter().map(|f| (f.follower, f.following)).collect();
        assert_eq!(follows.len(), FOLLOWS.len());
    }

    #[test]
    fn test_categories_point_at_boxes() {
        let box_ids: HashSet<_> = BOXES.iter().map(|b| b.id).collect();
        assert!(CATEGORIES.iter().all(|c| box_ids.contains(&c.box_id)));
    }

    #[test]
    fn test_user_row_never_holds_plaintext() {
        let row = USERS[0].to_row("$2b$10$hash");
        assert_eq!(row.get("password"), Some(&SqlValue::from("$2b$10$hash")));
        let plaintext = SqlValue::from(SAMPLE_PASSWORD);
        assert!(row.iter().all(|(_, v)| *v != plaintext));
    }

    #[test]
    fn test_echoed_accounts() {
        let phones: Vec<_> = echoed_accounts().map(|u| u.phone).collect();
        assert_eq!(phones, vec!["07701234567", "07789012345"]);
    }
}
