

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityType {
    Food,
    NonFood,
}

impl ActivityType {

    pub fn of(category: &str) -> Self {
        let category = category.trim();
        if FOOD_KEYWORDS.iter().any(|kw| category.contains(kw)) {
            Self::Food
        } else {
            Self::NonFood
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Food => Self::NonFood,
            Self::NonFood => Self::Food,
        }
    }
}

const FOOD_KEYWORDS: &[&str] = &[
    "식", "요리", "음료", "카페", "제과", "주점", "패스트푸드", "부페", "뷔페",
];

lazy_static! {
    // raw category -> canonical bucket; None marks categories that are never recommended
    static ref CATEGORY_MAPPING: HashMap<&'static str, Option<&'static str>> = {
        let mut m = HashMap::new();
        let mut map = |canonical: Option<&'static str>, raws: &[&'static str]| {
            for raw in raws {
                m.insert(*raw, canonical);
            }
        };

        map(Some("한식"), &[
            "한식", "국밥", "곰탕", "설렁탕", "찌개,전골", "해장국", "감자탕", "삼계탕",
            "한정식", "쌈밥", "두부전문점", "기사식당", "추어", "국수", "수제비",
        ]);
        map(Some("고기요리"), &[
            "육류,고기", "고기요리", "삼겹살", "갈비", "불고기,두루치기", "족발,보쌈",
            "곱창,막창", "사철탕,영양탕",
        ]);
        map(Some("닭/오리요리"), &["닭요리", "닭/오리요리", "닭강정", "치킨", "오리"]);
        map(Some("중식"), &["중식", "중국요리"]);
        map(Some("일식/수산물"), &[
            "일식", "일식집", "일식/수산물", "초밥,롤", "참치회", "회", "해물,생선",
            "돈까스,우동", "일본식라면", "퓨전일식", "조개", "게,대게", "장어", "아구",
        ]);
        map(Some("양식"), &["양식", "이탈리안", "프랑스음식", "스테이크,립", "패밀리레스토랑"]);
        map(Some("별식/퓨전요리"), &[
            "베트남음식", "태국음식", "동남아음식", "멕시칸,브라질", "스페인음식", "인도음식",
            "아시아음식", "퓨전요리", "별식/퓨전요리", "퓨전한식",
        ]);
        map(Some("커피/음료"), &[
            "카페", "커피/음료", "커피전문점", "디저트카페", "테마카페", "다방", "전통찻집",
        ]);
        map(Some("제과/제빵/떡/케익"), &[
            "제과,베이커리", "제과/제빵/떡/케익", "도넛", "아이스크림", "아이스크림판매",
        ]);
        map(Some("유흥주점"), &[
            "유흥주점", "일본식주점", "실내포장마차", "호프,요리주점", "술집", "칵테일바",
        ]);
        map(Some("분식"), &["분식", "떡볶이", "순대", "간식"]);
        map(Some("패스트푸드"), &["패스트푸드", "햄버거", "피자", "샌드위치", "도시락"]);
        map(Some("부페"), &["부페", "뷔페", "해산물뷔페", "한식뷔페", "고기뷔페"]);

        map(Some("의류판매"), &[
            "의류판매", "여성의류", "의류수선", "의류할인매장", "상설할인매장", "면세점",
        ]);
        map(Some("대형마트"), &["대형마트", "대형슈퍼", "슈퍼마켓", "식품판매"]);
        map(Some("복합쇼핑몰"), &["복합쇼핑몰"]);
        map(Some("가구판매"), &["가구판매", "가구거리"]);
        map(Some("주방용품"), &["주방용품"]);
        map(Some("인테리어장식판매"), &["인테리어장식판매", "커튼,블라인드판매"]);
        map(Some("꽃집,꽃배달"), &["꽃집,꽃배달"]);
        map(Some("음반,레코드샵"), &["음반,레코드샵"]);
        map(Some("디자인문구"), &["디자인문구"]);
        map(Some("문구,사무용품"), &["문구,사무용품"]);
        map(Some("서점"), &["서점", "중고서점", "독립서점"]);

        map(Some("경기관람"), &["경기관람"]);
        map(Some("스포츠/레저"), &[
            "스포츠/레저", "일반스포츠", "공원", "도시근린공원", "공원시설물", "놀이터", "산",
            "등산로", "둘레길", "야영,캠핑장", "글램핑장", "자연휴양림", "자전거여행",
            "도보여행", "체험여행",
        ]);
        map(Some("전시장"), &[
            "전시장", "전시관", "미술관", "박물관", "과학관", "기념관", "갤러리카페",
        ]);
        map(Some("공연장,연극극장"), &["공연장,연극극장"]);
        map(Some("테마파크"), &[
            "테마파크", "테마파크시설", "아쿠아리움", "워터테마파크", "동물원", "실내동물원",
            "놀이시설",
        ]);
        map(Some("취미/오락"), &[
            "취미/오락", "미술,공예", "음악", "사진관,포토스튜디오", "미술학원", "녹음실",
            "PC방", "노래방", "북카페", "키즈카페", "음악감상실",
        ]);
        map(Some("관광,명소"), &["호수", "강", "하천", "드라이브코스", "촬영지", "관광,명소"]);
        map(Some("체험여행"), &["정보화,체험마을"]);
        map(Some("반려동물"), &[
            "반려동물", "반려동물용품", "반려동물미용", "반려동물분양", "반려견놀이터",
        ]);
        map(Some("호텔"), &["호텔", "여관,모텔", "게스트하우스"]);
        map(Some("펜션"), &["펜션"]);
        map(Some("미용"), &["미용", "미용실", "네일샵", "체형관리"]);

        map(None, &[
            "지명", "nan", "종합건설사", "빌라,주택", "화학", "농장,목장", "보관,저장",
            "원예업", "출판사", "어린이집", "냉난방기제조", "직업소개,인력파견", "산업용품",
            "비철금속처리",
        ]);
        m
    };
}


/// Canonical bucket for a raw venue category, or `None` when it is unmapped
/// or deliberately excluded.
pub fn normalize(raw_category: &str) -> Option<String> {
    CATEGORY_MAPPING
        .get(raw_category.trim())
        .copied()
        .flatten()
        .map(|canonical| canonical.trim().to_string())
        .filter(|canonical| !canonical.is_empty())
}


pub fn known_canonical_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = CATEGORY_MAPPING.values().flatten().copied().collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_many_to_one() {
        assert_eq!(normalize("국밥").as_deref(), Some("한식"));
        assert_eq!(normalize("삼겹살").as_deref(), Some("고기요리"));
        assert_eq!(normalize("디저트카페").as_deref(), Some("커피/음료"));
        assert_eq!(normalize("미술관").as_deref(), Some("전시장"));
    }

    #[test]
    fn test_normalize_trims_input() {
        assert_eq!(normalize("  치킨 ").as_deref(), Some("닭/오리요리"));
    }

    #[test]
    fn test_non_actionable_and_unknown_are_none() {
        assert_eq!(normalize("화학"), None);
        assert_eq!(normalize("nan"), None);
        assert_eq!(normalize("우주정거장"), None);
    }

    #[test]
    fn test_activity_type() {
        for food in ["한식", "고기요리", "커피/음료", "제과/제빵/떡/케익", "유흥주점", "분식", "패스트푸드", "부페"] {
            assert_eq!(ActivityType::of(food), ActivityType::Food, "{food}");
        }
        for other in ["전시장", "취미/오락", "스포츠/레저", "호텔", "서점", "의류판매", "관광,명소"] {
            assert_eq!(ActivityType::of(other), ActivityType::NonFood, "{other}");
        }
    }

    #[test]
    fn test_canonical_categories_are_trimmed() {
        for canonical in known_canonical_categories() {
            assert_eq!(canonical, canonical.trim());
        }
        assert!(known_canonical_categories().len() > 30);
    }

    #[test]
    fn test_activity_type_strings() {
        assert_eq!(ActivityType::Food.to_string(), "food");
        assert_eq!("non_food".parse::<ActivityType>().unwrap(), ActivityType::NonFood);
        assert_eq!(ActivityType::Food.opposite(), ActivityType::NonFood);
    }
}
